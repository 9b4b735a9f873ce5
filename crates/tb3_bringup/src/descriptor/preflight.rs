//! Preflight checks for a composed description
//!
//! The builder itself performs no validation; missing files only fail once
//! the external tooling tries to open them. `preflight` front-loads the two
//! checks that catch most broken installs: every included launch file exists,
//! and a `params_file` argument points at a readable YAML document.

use crate::descriptor::{LaunchAction, LaunchDescription};
use std::path::{Path, PathBuf};

/// Check that the description's filesystem inputs are present and well-formed
pub fn preflight(description: &LaunchDescription) -> Result<(), PreflightError> {
    for action in description.actions() {
        let LaunchAction::Include(include) = action else {
            continue;
        };

        if !include.launch_file.is_file() {
            return Err(PreflightError::MissingLaunchFile {
                action: include.name.clone(),
                path: include.launch_file.clone(),
            });
        }

        if let Some(params) = include.arguments.get("params_file") {
            check_params_file(&include.name, Path::new(params))?;
        }
    }

    Ok(())
}

fn check_params_file(action: &str, path: &Path) -> Result<(), PreflightError> {
    let contents = std::fs::read_to_string(path).map_err(|source| PreflightError::ParamsFile {
        action: action.to_string(),
        path: path.to_path_buf(),
        source,
    })?;

    serde_yaml::from_str::<serde_yaml::Value>(&contents).map_err(|source| {
        PreflightError::ParamsYaml {
            action: action.to_string(),
            path: path.to_path_buf(),
            source,
        }
    })?;

    Ok(())
}

/// Errors reported by the preflight checks
#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    #[error("Action '{action}': launch file '{path}' does not exist", path = .path.display())]
    MissingLaunchFile { action: String, path: PathBuf },

    #[error("Action '{action}': cannot read params file '{path}': {source}", path = .path.display())]
    ParamsFile {
        action: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Action '{action}': params file '{path}' is not valid YAML: {source}", path = .path.display())]
    ParamsYaml {
        action: String,
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::IncludeLaunch;
    use indexmap::IndexMap;

    fn include(name: &str, launch_file: PathBuf, params: Option<String>) -> LaunchAction {
        let mut arguments = IndexMap::new();
        if let Some(params) = params {
            arguments.insert("params_file".to_string(), params);
        }
        LaunchAction::Include(IncludeLaunch {
            name: name.to_string(),
            launch_file,
            arguments,
        })
    }

    #[test]
    fn test_preflight_passes_on_valid_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let launch = dir.path().join("world.launch.py");
        let params = dir.path().join("waffle.yaml");
        std::fs::write(&launch, "").unwrap();
        std::fs::write(&params, "controller_server:\n  ros__parameters:\n    use_sim_time: true\n").unwrap();

        let description = LaunchDescription::from_iter([include(
            "navigation",
            launch,
            Some(params.to_string_lossy().into_owned()),
        )]);
        assert!(preflight(&description).is_ok());
    }

    #[test]
    fn test_missing_launch_file() {
        let description = LaunchDescription::from_iter([include(
            "gazebo_world",
            PathBuf::from("/does/not/exist.launch.py"),
            None,
        )]);
        assert!(matches!(
            preflight(&description),
            Err(PreflightError::MissingLaunchFile { action, .. }) if action == "gazebo_world"
        ));
    }

    #[test]
    fn test_missing_params_file() {
        let dir = tempfile::tempdir().unwrap();
        let launch = dir.path().join("nav2.launch.py");
        std::fs::write(&launch, "").unwrap();

        let description = LaunchDescription::from_iter([include(
            "navigation",
            launch,
            Some("/does/not/exist.yaml".to_string()),
        )]);
        assert!(matches!(
            preflight(&description),
            Err(PreflightError::ParamsFile { .. })
        ));
    }

    #[test]
    fn test_malformed_params_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let launch = dir.path().join("nav2.launch.py");
        let params = dir.path().join("broken.yaml");
        std::fs::write(&launch, "").unwrap();
        std::fs::write(&params, "key: [unclosed\n").unwrap();

        let description = LaunchDescription::from_iter([include(
            "navigation",
            launch,
            Some(params.to_string_lossy().into_owned()),
        )]);
        assert!(matches!(
            preflight(&description),
            Err(PreflightError::ParamsYaml { .. })
        ));
    }
}
