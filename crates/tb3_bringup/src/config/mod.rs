//! Bringup configuration and installed-package lookup

mod ament;
mod bringup;

pub use ament::{AmentError, AmentIndex};
pub use bringup::{BringupConfig, ConfigError, TurtleBot3Model};
