//! TurtleBot3 Combined Bringup
//!
//! A ROS2-style launch composer for the TurtleBot3 simulation stack. It
//! builds one fixed launch description — Gazebo world, Navigation2,
//! trajectory recorder, trajectory visualizer and an rqt service caller —
//! and either prints it as a plan or runs it through the `ros2` CLI.
//!
//! # Overview
//!
//! - Resolve the robot model and ROS distro from the environment (with
//!   local defaults, never mutating the process environment)
//! - Look up installed-package share directories through the ament
//!   resource index
//! - Compose the five launch actions in a fixed order
//! - Start them sequentially and shut them down in reverse on Ctrl-C
//!
//! # Example
//!
//! ```no_run
//! use tb3_bringup::{bringup_description, AmentIndex, BringupConfig};
//!
//! let config = BringupConfig::from_env()?;
//! let index = AmentIndex::from_env();
//! let description = bringup_description(&config, &index)?;
//! assert_eq!(description.actions().len(), 5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod descriptor;
pub mod runtime;

pub use cli::BringupArgs;
pub use config::{AmentError, AmentIndex, BringupConfig, ConfigError, TurtleBot3Model};
pub use descriptor::{
    bringup_description, preflight, BringupError, ExecuteProcess, IncludeLaunch, LaunchAction,
    LaunchDescription, PreflightError, RosNode,
};
pub use runtime::{
    Executor, ExecutorConfig, ExecutorError, LaunchPlan, ManagedProcess, ProcessConfig,
    ProcessError, ProcessEvent, ProcessStatus,
};
