//! Typed launch actions and the composed bringup description

mod bringup;
mod preflight;

pub use bringup::{bringup_description, BringupError};
pub use preflight::{preflight, PreflightError};

use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

/// Inclusion of an external launch file with launch arguments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncludeLaunch {
    /// Action name, for logging and filtering
    pub name: String,
    /// Path to the included launch file
    pub launch_file: PathBuf,
    /// Launch arguments, in declaration order
    pub arguments: IndexMap<String, String>,
}

/// A ROS node started by (package, executable) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosNode {
    /// Action name, for logging and filtering
    pub name: String,
    /// ROS package the executable lives in
    pub package: String,
    /// Executable name within the package
    pub executable: String,
}

/// A standalone process started by raw command line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecuteProcess {
    /// Action name, for logging and filtering
    pub name: String,
    /// Full command line, program first
    pub command: Vec<String>,
}

/// One entry of a launch description
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LaunchAction {
    Include(IncludeLaunch),
    Node(RosNode),
    Process(ExecuteProcess),
}

impl LaunchAction {
    /// The action's name
    pub fn name(&self) -> &str {
        match self {
            LaunchAction::Include(include) => &include.name,
            LaunchAction::Node(node) => &node.name,
            LaunchAction::Process(process) => &process.name,
        }
    }
}

/// A flat, ordered list of launch actions
///
/// Order is the only relationship between entries: the runtime starts them
/// front to back and stops them back to front.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LaunchDescription {
    actions: Vec<LaunchAction>,
}

impl LaunchDescription {
    /// Append an action
    pub fn push(&mut self, action: LaunchAction) {
        self.actions.push(action);
    }

    /// The actions, in launch order
    pub fn actions(&self) -> &[LaunchAction] {
        &self.actions
    }

    /// Consume into the action list
    pub fn into_actions(self) -> Vec<LaunchAction> {
        self.actions
    }
}

impl FromIterator<LaunchAction> for LaunchDescription {
    fn from_iter<T: IntoIterator<Item = LaunchAction>>(iter: T) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}
