//! Bringup configuration resolved from the environment
//!
//! The launch file this replaces force-set `TURTLEBOT3_MODEL=waffle` for the
//! whole process before reading it back, which silently defeated any override
//! the user had exported. Here the defaults live in the config itself and the
//! process environment is only ever read, never written.

use std::path::PathBuf;
use std::str::FromStr;

/// TurtleBot3 model variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TurtleBot3Model {
    Burger,
    #[default]
    Waffle,
    WafflePi,
}

impl TurtleBot3Model {
    /// Model name as used in parameter-file names and `TURTLEBOT3_MODEL`
    pub fn as_str(&self) -> &'static str {
        match self {
            TurtleBot3Model::Burger => "burger",
            TurtleBot3Model::Waffle => "waffle",
            TurtleBot3Model::WafflePi => "waffle_pi",
        }
    }
}

impl FromStr for TurtleBot3Model {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "burger" => Ok(TurtleBot3Model::Burger),
            "waffle" => Ok(TurtleBot3Model::Waffle),
            "waffle_pi" => Ok(TurtleBot3Model::WafflePi),
            other => Err(ConfigError::UnknownModel(other.to_string())),
        }
    }
}

impl std::fmt::Display for TurtleBot3Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the combined bringup
#[derive(Debug, Clone, PartialEq)]
pub struct BringupConfig {
    /// Robot model variant (selects the Navigation2 parameter file)
    pub model: TurtleBot3Model,
    /// ROS distro name (selects the parameter-file subdirectory)
    pub distro: String,
    /// Run all nodes against simulated clock
    pub use_sim_time: bool,
    /// Autostart the Navigation2 lifecycle nodes
    pub autostart: bool,
    /// Explicit Navigation2 parameter file, overriding the resolved path
    pub params_file: Option<PathBuf>,
}

impl Default for BringupConfig {
    fn default() -> Self {
        Self {
            model: TurtleBot3Model::default(),
            distro: "humble".to_string(),
            use_sim_time: true,
            autostart: true,
            params_file: None,
        }
    }
}

impl BringupConfig {
    /// Resolve from `TURTLEBOT3_MODEL` and `ROS_DISTRO`, with defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve from an injected variable lookup
    ///
    /// Unset variables fall back to the defaults (`waffle`, `humble`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(model) = lookup("TURTLEBOT3_MODEL") {
            config.model = model.parse()?;
        }
        if let Some(distro) = lookup("ROS_DISTRO") {
            config.distro = distro;
        }

        Ok(config)
    }
}

/// Errors that can occur when resolving the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown TurtleBot3 model '{0}' (expected burger, waffle or waffle_pi)")]
    UnknownModel(String),
}
