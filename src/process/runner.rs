//! Running sub-commands to completion.
//!
//! # Responsibilities
//! - Spawn a command with inherited stdio
//! - Wait for it without a deadline
//! - Report only how it ended
//!
//! The [`CommandRunner`] trait is the seam tests use to script exit codes.

use std::fmt;
use std::future::Future;
use std::io;

use tokio::process::Command;

use crate::process::command::CommandSpec;

/// How a finished command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Normal exit with a code.
    Exited(i32),
    /// Killed by a signal, no exit code.
    Terminated,
}

impl CommandStatus {
    pub fn success(self) -> bool {
        self == CommandStatus::Exited(0)
    }
}

impl From<std::process::ExitStatus> for CommandStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        match status.code() {
            Some(code) => CommandStatus::Exited(code),
            None => CommandStatus::Terminated,
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandStatus::Exited(code) => write!(f, "exit code {}", code),
            CommandStatus::Terminated => write!(f, "terminated by signal"),
        }
    }
}

/// Executes external commands and reports their status.
pub trait CommandRunner {
    /// Run `spec` to completion. `Err` means it could not be started.
    fn run(&self, spec: &CommandSpec) -> impl Future<Output = io::Result<CommandStatus>>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> io::Result<CommandStatus> {
        tracing::debug!(command = %spec, "Spawning command");

        let status = Command::new(&spec.program)
            .args(&spec.args)
            .envs(spec.env.iter().map(|(k, v)| (k, v)))
            .status()
            .await?;

        Ok(status.into())
    }
}
