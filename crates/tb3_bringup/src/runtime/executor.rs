//! Launch executor - sequential startup, reverse-order shutdown
//!
//! Actions start strictly in description order. There is no dependency
//! graph, no restart policy and no recovery: a failure to spawn aborts the
//! launch, and anything that fails later is reported and left to the
//! operator.

use crate::descriptor::{LaunchAction, LaunchDescription};
use crate::runtime::process::{ManagedProcess, ProcessConfig, ProcessEvent, ProcessStatus};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Launch executor configuration
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Shutdown timeout per process before SIGKILL
    pub shutdown_timeout: Duration,
    /// Actions to skip at execution time (by action name)
    pub disable: HashSet<String>,
    /// The `ros2` CLI entry point, overridable for tests
    pub ros2_program: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout: Duration::from_secs(5),
            disable: HashSet::new(),
            ros2_program: "ros2".to_string(),
        }
    }
}

/// Launch executor state
pub struct Executor {
    config: ExecutorConfig,
    description: LaunchDescription,
    processes: IndexMap<String, ManagedProcess>,
    event_tx: mpsc::UnboundedSender<(String, ProcessEvent)>,
    event_rx: mpsc::UnboundedReceiver<(String, ProcessEvent)>,
}

/// A resolved command line for one action
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PlannedCommand {
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
    pub skipped: bool,
}

/// The fully resolved launch plan, for dry-run output
#[derive(Debug, serde::Serialize)]
pub struct LaunchPlan {
    pub commands: Vec<PlannedCommand>,
}

impl Executor {
    pub fn new(description: LaunchDescription, config: ExecutorConfig) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            config,
            description,
            processes: IndexMap::new(),
            event_tx,
            event_rx,
        }
    }

    /// Map an action to the command line that realizes it
    fn resolve_command(action: &LaunchAction, ros2_program: &str) -> (String, Vec<String>) {
        match action {
            LaunchAction::Include(include) => {
                let mut args = vec![
                    "launch".to_string(),
                    include.launch_file.to_string_lossy().into_owned(),
                ];
                args.extend(
                    include
                        .arguments
                        .iter()
                        .map(|(key, value)| format!("{key}:={value}")),
                );
                (ros2_program.to_string(), args)
            }
            LaunchAction::Node(node) => (
                ros2_program.to_string(),
                vec![
                    "run".to_string(),
                    node.package.clone(),
                    node.executable.clone(),
                ],
            ),
            LaunchAction::Process(process) => {
                let mut command = process.command.clone();
                let program = if command.is_empty() {
                    String::new()
                } else {
                    command.remove(0)
                };
                (program, command)
            }
        }
    }

    /// Resolve every action without spawning anything
    pub fn plan(&self) -> LaunchPlan {
        let commands = self
            .description
            .actions()
            .iter()
            .map(|action| {
                let (program, args) = Self::resolve_command(action, &self.config.ros2_program);
                PlannedCommand {
                    name: action.name().to_string(),
                    program,
                    args,
                    skipped: self.config.disable.contains(action.name()),
                }
            })
            .collect();
        LaunchPlan { commands }
    }

    /// Start all actions in description order
    pub async fn launch(&mut self, shutdown_rx: watch::Receiver<()>) -> Result<(), ExecutorError> {
        let plan = self.plan();
        let active = plan.commands.iter().filter(|c| !c.skipped).count();
        log::info!("Launching {} of {} actions...", active, plan.commands.len());

        for command in plan.commands {
            if shutdown_rx.has_changed().unwrap_or(false) {
                log::info!("Shutdown requested, aborting launch");
                break;
            }

            if command.skipped {
                log::info!("[{}] Disabled, skipping", command.name);
                continue;
            }

            let mut process = ManagedProcess::new(ProcessConfig {
                name: command.name.clone(),
                program: command.program,
                args: command.args,
            })
            .with_event_sender(self.event_tx.clone());

            process.start().await.map_err(|e| ExecutorError::Startup {
                action: command.name.clone(),
                source: e,
            })?;

            self.processes.insert(command.name, process);
        }

        log::info!("All actions launched");
        Ok(())
    }

    /// Block until shutdown is signalled or every process has exited
    pub async fn wait(&mut self, mut shutdown_rx: watch::Receiver<()>) {
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    log::info!("Shutdown signal received");
                    break;
                }

                event = self.event_rx.recv() => {
                    if let Some((name, event)) = event {
                        match event {
                            ProcessEvent::Output { line, is_stderr } => {
                                if is_stderr {
                                    log::warn!("[{}] {}", name, line);
                                } else {
                                    log::info!("[{}] {}", name, line);
                                }
                            }
                            ProcessEvent::Exited { code } => {
                                log::info!("[{}] Process exited with code: {:?}", name, code);
                            }
                            ProcessEvent::Started { pid } => {
                                log::info!("[{}] Process started with PID: {}", name, pid);
                            }
                        }
                    }
                }

                _ = tokio::time::sleep(Duration::from_secs(1)) => {
                    let all_stopped = self
                        .processes
                        .values_mut()
                        .all(|process| process.check_status().is_stopped());
                    if all_stopped {
                        log::info!("All processes have stopped");
                        break;
                    }
                }
            }
        }
    }

    /// Stop every running process, last started first
    pub async fn shutdown(&mut self) {
        log::info!("Shutting down all processes...");

        let names: Vec<String> = self.processes.keys().cloned().collect();
        for name in names.into_iter().rev() {
            if let Some(process) = self.processes.get_mut(&name) {
                if process.status.is_running() {
                    if let Err(e) = process.stop(self.config.shutdown_timeout).await {
                        log::error!("[{}] Error stopping process: {}", name, e);
                    }
                }
            }
        }

        log::info!("All processes shut down");
    }

    /// Current status of every spawned process, in launch order
    pub fn status(&self) -> Vec<(&str, ProcessStatus)> {
        self.processes
            .iter()
            .map(|(name, process)| (name.as_str(), process.status))
            .collect()
    }
}

/// Errors that can occur in the executor
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("Failed to start action '{action}': {source}")]
    Startup {
        action: String,
        #[source]
        source: crate::runtime::process::ProcessError,
    },
}

impl std::fmt::Display for LaunchPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Launch Plan")?;
        writeln!(f, "===========")?;

        for (i, command) in self.commands.iter().enumerate() {
            writeln!(f)?;
            writeln!(
                f,
                "  {}. {}{}",
                i + 1,
                command.name,
                if command.skipped { " [disabled]" } else { "" }
            )?;
            writeln!(f, "     Command: {} {}", command.program, command.args.join(" "))?;
        }

        Ok(())
    }
}
