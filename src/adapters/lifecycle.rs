//! Compute-lifecycle collaborator
//!
//! The hosting worker is started for one run and stops itself afterwards. The
//! terminate call is fire-and-forget: the spawned command is not awaited.

use crate::domain::{Result, SyncError};
use std::process::{Command, Stdio};

/// Environment variable read when no validated configuration is available
pub const TERMINATE_COMMAND_ENV: &str = "TABLESWAP_LIFECYCLE_TERMINATE_COMMAND";

/// Stops the hosting worker
pub trait WorkerLifecycle: Send + Sync {
    /// Requests termination. Called once, as the last step of a run.
    fn terminate(&self) -> Result<()>;
}

/// Runs a configured command, e.g. `sudo shutdown -h now`
#[derive(Debug, Clone)]
pub struct CommandLifecycle {
    argv: Vec<String>,
}

impl CommandLifecycle {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl WorkerLifecycle for CommandLifecycle {
    fn terminate(&self) -> Result<()> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| SyncError::Lifecycle("terminate command is empty".to_string()))?;

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SyncError::Lifecycle(format!("Failed to start '{program}': {e}")))?;

        tracing::info!(program = %program, pid = child.id(), "Worker termination requested");
        Ok(())
    }
}

/// Logs the request and does nothing else
#[derive(Debug, Default, Clone)]
pub struct NoopLifecycle;

impl WorkerLifecycle for NoopLifecycle {
    fn terminate(&self) -> Result<()> {
        tracing::info!("No terminate command configured, worker keeps running");
        Ok(())
    }
}

/// Builds the lifecycle for a terminate command, no-op when empty
pub fn from_argv(argv: &[String]) -> Box<dyn WorkerLifecycle> {
    if argv.is_empty() {
        Box::new(NoopLifecycle)
    } else {
        Box::new(CommandLifecycle::new(argv.to_vec()))
    }
}

/// Builds the lifecycle from [`TERMINATE_COMMAND_ENV`] (whitespace-separated argv)
pub fn from_env() -> Box<dyn WorkerLifecycle> {
    let argv: Vec<String> = std::env::var(TERMINATE_COMMAND_ENV)
        .map(|val| val.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    from_argv(&argv)
}
