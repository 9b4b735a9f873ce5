//! Managed child process with piped output and graceful stop

use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

/// Process status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Not started yet
    Pending,
    /// Running
    Running,
    /// Exited with the given code
    Stopped(Option<i32>),
    /// Failed to spawn
    Failed,
}

impl ProcessStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, ProcessStatus::Running)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, ProcessStatus::Stopped(_) | ProcessStatus::Failed)
    }
}

/// Command line for one managed process
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// Name used to prefix log output
    pub name: String,
    /// Program to execute
    pub program: String,
    /// Command line arguments
    pub args: Vec<String>,
}

/// Event emitted by a managed process
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    Started { pid: u32 },
    Output { line: String, is_stderr: bool },
    Exited { code: Option<i32> },
}

type EventSender = mpsc::UnboundedSender<(String, ProcessEvent)>;

/// A child process owned by the launch runtime
pub struct ManagedProcess {
    pub config: ProcessConfig,
    pub status: ProcessStatus,
    pid: Option<u32>,
    child: Option<Child>,
    event_tx: Option<EventSender>,
}

impl ManagedProcess {
    pub fn new(config: ProcessConfig) -> Self {
        Self {
            config,
            status: ProcessStatus::Pending,
            pid: None,
            child: None,
            event_tx: None,
        }
    }

    /// Attach an event channel for output and lifecycle events
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn emit(&self, event: ProcessEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send((self.config.name.clone(), event));
        }
    }

    /// Spawn the process
    pub async fn start(&mut self) -> Result<(), ProcessError> {
        if self.status.is_running() {
            return Err(ProcessError::AlreadyRunning(self.config.name.clone()));
        }

        log::info!(
            "[{}] Starting: {} {}",
            self.config.name,
            self.config.program,
            self.config.args.join(" ")
        );

        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            self.status = ProcessStatus::Failed;
            ProcessError::SpawnFailed {
                name: self.config.name.clone(),
                source: e,
            }
        })?;

        let pid = child.id().unwrap_or(0);
        self.pid = Some(pid);
        self.status = ProcessStatus::Running;
        self.emit(ProcessEvent::Started { pid });

        if let Some(tx) = self.event_tx.clone() {
            if let Some(stdout) = child.stdout.take() {
                pump_output(self.config.name.clone(), tx.clone(), stdout, false);
            }
            if let Some(stderr) = child.stderr.take() {
                pump_output(self.config.name.clone(), tx, stderr, true);
            }
        }

        self.child = Some(child);
        Ok(())
    }

    /// Stop gracefully: SIGTERM, then SIGKILL after the timeout
    pub async fn stop(&mut self, timeout: Duration) -> Result<(), ProcessError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        log::info!("[{}] Stopping process...", self.config.name);
        self.signal(Signal::Term, &mut child).await;

        match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(status)) => {
                let code = status.code();
                self.status = ProcessStatus::Stopped(code);
                log::info!("[{}] Process exited with code: {:?}", self.config.name, code);
                self.emit(ProcessEvent::Exited { code });
            }
            Ok(Err(e)) => {
                log::error!("[{}] Error waiting for process: {}", self.config.name, e);
                self.status = ProcessStatus::Stopped(None);
            }
            Err(_) => {
                log::warn!(
                    "[{}] Process did not exit within {:?}, forcing kill",
                    self.config.name,
                    timeout
                );
                self.signal(Signal::Kill, &mut child).await;
                self.status = ProcessStatus::Stopped(None);
                self.emit(ProcessEvent::Exited { code: None });
            }
        }

        self.pid = None;
        Ok(())
    }

    #[cfg(unix)]
    async fn signal(&self, signal: Signal, _child: &mut Child) {
        use nix::sys::signal::{kill, Signal as NixSignal};
        use nix::unistd::Pid;

        if let Some(pid) = self.pid {
            let signal = match signal {
                Signal::Term => NixSignal::SIGTERM,
                Signal::Kill => NixSignal::SIGKILL,
            };
            let _ = kill(Pid::from_raw(pid as i32), signal);
        }
    }

    #[cfg(not(unix))]
    async fn signal(&self, _signal: Signal, child: &mut Child) {
        let _ = child.kill().await;
    }

    /// Poll the child for exit without blocking
    pub fn check_status(&mut self) -> ProcessStatus {
        if let Some(child) = &mut self.child {
            match child.try_wait() {
                Ok(Some(status)) => {
                    let code = status.code();
                    self.status = ProcessStatus::Stopped(code);
                    self.pid = None;
                    self.child = None;
                    self.emit(ProcessEvent::Exited { code });
                }
                Ok(None) => {}
                Err(e) => {
                    log::error!("[{}] Error checking process status: {}", self.config.name, e);
                }
            }
        }

        self.status
    }
}

enum Signal {
    Term,
    Kill,
}

/// Forward lines from a child pipe to the event channel
fn pump_output<R>(name: String, tx: EventSender, pipe: R, is_stderr: bool)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(pipe).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let _ = tx.send((name.clone(), ProcessEvent::Output { line, is_stderr }));
        }
    });
}

/// Errors that can occur with managed processes
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Process '{0}' is already running")]
    AlreadyRunning(String),

    #[error("Failed to spawn process '{name}': {source}")]
    SpawnFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
