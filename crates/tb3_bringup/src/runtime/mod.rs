//! Sequential launch runtime

mod executor;
mod process;

pub use executor::{Executor, ExecutorConfig, ExecutorError, LaunchPlan, PlannedCommand};
pub use process::{ManagedProcess, ProcessConfig, ProcessError, ProcessEvent, ProcessStatus};
