//! The combined bringup description
//!
//! Composes the five actions of the TurtleBot3 simulation bringup: Gazebo
//! world, Navigation2, the two trajectory nodes and the rqt service caller.

use crate::config::{AmentError, AmentIndex, BringupConfig};
use crate::descriptor::{
    ExecuteProcess, IncludeLaunch, LaunchAction, LaunchDescription, RosNode,
};
use indexmap::IndexMap;

/// Build the combined bringup description
///
/// The result always holds exactly five actions, in this order:
/// `gazebo_world`, `navigation`, `trajectory_saver`, `trajectory_visualizer`,
/// `service_caller`. The only failure mode is share-directory resolution;
/// anything else (missing launch file, crashing executable) surfaces when the
/// description is run.
pub fn bringup_description(
    config: &BringupConfig,
    index: &AmentIndex,
) -> Result<LaunchDescription, BringupError> {
    let gazebo_share = index.share_directory("turtlebot3_gazebo")?;
    let nav2_share = index.share_directory("turtlebot3_navigation2")?;

    let use_sim_time = config.use_sim_time.to_string();

    let world = IncludeLaunch {
        name: "gazebo_world".to_string(),
        launch_file: gazebo_share.join("launch/turtlebot3_world.launch.py"),
        arguments: IndexMap::from([("use_sim_time".to_string(), use_sim_time.clone())]),
    };

    let params_file = match &config.params_file {
        Some(path) => path.clone(),
        None => nav2_share
            .join("param")
            .join(&config.distro)
            .join(format!("{}.yaml", config.model)),
    };

    let navigation = IncludeLaunch {
        name: "navigation".to_string(),
        launch_file: nav2_share.join("launch/navigation2.launch.py"),
        arguments: IndexMap::from([
            ("use_sim_time".to_string(), use_sim_time),
            ("autostart".to_string(), config.autostart.to_string()),
            (
                "params_file".to_string(),
                params_file.to_string_lossy().into_owned(),
            ),
        ]),
    };

    let saver = RosNode {
        name: "trajectory_saver".to_string(),
        package: "my_py_pkg_anscer".to_string(),
        executable: "trajectory_publisher_saver".to_string(),
    };

    let visualizer = RosNode {
        name: "trajectory_visualizer".to_string(),
        package: "my_py_pkg_anscer".to_string(),
        executable: "trajectory_visualizer".to_string(),
    };

    let service_caller = ExecuteProcess {
        name: "service_caller".to_string(),
        command: vec![
            "rqt".to_string(),
            "--standalone".to_string(),
            "rqt_service_caller".to_string(),
        ],
    };

    Ok(LaunchDescription::from_iter([
        LaunchAction::Include(world),
        LaunchAction::Include(navigation),
        LaunchAction::Node(saver),
        LaunchAction::Node(visualizer),
        LaunchAction::Process(service_caller),
    ]))
}

/// Errors that can occur while composing the description
#[derive(Debug, thiserror::Error)]
pub enum BringupError {
    #[error(transparent)]
    Ament(#[from] AmentError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TurtleBot3Model;
    use std::path::Path;

    fn test_index() -> (AmentIndex, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        for package in ["turtlebot3_gazebo", "turtlebot3_navigation2"] {
            let marker_dir = dir
                .path()
                .join("share/ament_index/resource_index/packages");
            std::fs::create_dir_all(&marker_dir).unwrap();
            std::fs::write(marker_dir.join(package), "").unwrap();
        }
        (AmentIndex::new(vec![dir.path().to_path_buf()]), dir)
    }

    fn nav2_include(description: &LaunchDescription) -> &IncludeLaunch {
        match &description.actions()[1] {
            LaunchAction::Include(include) => include,
            other => panic!("expected include, got {other:?}"),
        }
    }

    #[test]
    fn test_five_actions_in_fixed_order() {
        let (index, _dir) = test_index();
        let description = bringup_description(&BringupConfig::default(), &index).unwrap();

        let names: Vec<_> = description.actions().iter().map(|a| a.name()).collect();
        assert_eq!(
            names,
            vec![
                "gazebo_world",
                "navigation",
                "trajectory_saver",
                "trajectory_visualizer",
                "service_caller"
            ]
        );
    }

    #[test]
    fn test_world_include_uses_sim_time() {
        let (index, _dir) = test_index();
        let description = bringup_description(&BringupConfig::default(), &index).unwrap();

        let world = match &description.actions()[0] {
            LaunchAction::Include(include) => include,
            other => panic!("expected include, got {other:?}"),
        };
        assert!(world
            .launch_file
            .ends_with("launch/turtlebot3_world.launch.py"));
        assert_eq!(world.arguments.get("use_sim_time").unwrap(), "true");
    }

    #[test]
    fn test_navigation_arguments() {
        let (index, _dir) = test_index();
        let description = bringup_description(&BringupConfig::default(), &index).unwrap();

        let nav2 = nav2_include(&description);
        assert_eq!(nav2.arguments.get("autostart").unwrap(), "true");
        assert!(!nav2.arguments.get("params_file").unwrap().is_empty());
    }

    #[test]
    fn test_params_path_follows_distro_and_model() {
        let (index, _dir) = test_index();
        let config = BringupConfig {
            distro: "iron".to_string(),
            ..BringupConfig::default()
        };
        let description = bringup_description(&config, &index).unwrap();

        let params = Path::new(nav2_include(&description).arguments.get("params_file").unwrap())
            .to_path_buf();
        assert!(params
            .components()
            .any(|c| c.as_os_str() == "iron"));
        assert!(params.ends_with("waffle.yaml"));
        assert!(params.parent().unwrap().ends_with("param/iron"));
    }

    #[test]
    fn test_params_file_override() {
        let (index, _dir) = test_index();
        let config = BringupConfig {
            params_file: Some("/tmp/custom_nav2.yaml".into()),
            model: TurtleBot3Model::Burger,
            ..BringupConfig::default()
        };
        let description = bringup_description(&config, &index).unwrap();

        let nav2 = nav2_include(&description);
        assert_eq!(
            nav2.arguments.get("params_file").unwrap(),
            "/tmp/custom_nav2.yaml"
        );
    }

    #[test]
    fn test_builder_is_idempotent() {
        let (index, _dir) = test_index();
        let config = BringupConfig::default();

        let first = bringup_description(&config, &index).unwrap();
        let second = bringup_description(&config, &index).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_package_propagates() {
        let index = AmentIndex::default();
        let result = bringup_description(&BringupConfig::default(), &index);
        assert!(matches!(result, Err(BringupError::Ament(_))));
    }
}
