//! Command-line interface for tb3_bringup

use crate::config::{BringupConfig, ConfigError};
use argh::FromArgs;
use std::path::PathBuf;

/// Combined bringup for the TurtleBot3 simulation stack
#[derive(FromArgs, Debug)]
pub struct BringupArgs {
    /// robot model: burger, waffle or waffle_pi (default: TURTLEBOT3_MODEL or waffle)
    #[argh(option, short = 'm')]
    pub model: Option<String>,

    /// ROS distro for the parameter-file path (default: ROS_DISTRO or humble)
    #[argh(option, short = 'd')]
    pub distro: Option<String>,

    /// explicit Navigation2 parameter file, overriding the resolved path
    #[argh(option)]
    pub params_file: Option<PathBuf>,

    /// run against wall clock instead of simulated time
    #[argh(switch)]
    pub no_sim_time: bool,

    /// skip these actions at launch time (comma-separated names)
    #[argh(option, from_str_fn(parse_names))]
    pub disable: Option<Vec<String>>,

    /// show the launch plan without executing
    #[argh(switch)]
    pub dry_run: bool,

    /// print the dry-run plan as JSON instead of text
    #[argh(switch)]
    pub json: bool,

    /// check launch and parameter files exist, then exit
    #[argh(switch)]
    pub validate: bool,

    /// log level (error, warn, info, debug, trace)
    #[argh(option, short = 'l', default = "String::from(\"info\")")]
    pub log_level: String,
}

/// Parse a comma-separated action name list
fn parse_names(s: &str) -> Result<Vec<String>, String> {
    Ok(s.split(',').map(|n| n.trim().to_string()).collect())
}

impl BringupArgs {
    /// Environment-resolved config with CLI overrides applied on top
    pub fn resolve_config(&self) -> Result<BringupConfig, ConfigError> {
        let mut config = BringupConfig::from_env()?;

        if let Some(model) = &self.model {
            config.model = model.parse()?;
        }
        if let Some(distro) = &self.distro {
            config.distro = distro.clone();
        }
        if let Some(params_file) = &self.params_file {
            config.params_file = Some(params_file.clone());
        }
        if self.no_sim_time {
            config.use_sim_time = false;
        }

        Ok(config)
    }
}
