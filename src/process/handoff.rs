//! Final process handoff.
//!
//! On Unix the orchestrator replaces its own image with the server via
//! `exec`, so the server inherits the PID and receives signals directly.
//! Elsewhere the server is run in the foreground as the last action and
//! its exit code becomes ours.

use std::io;
use std::process::Command;

use thiserror::Error;

use crate::process::command::CommandSpec;

/// The server could not be started. Fatal.
#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("server program {program:?} not found")]
    NotFound {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("server program {program:?} could not be started: {source}")]
    Start {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl HandoffError {
    fn from_io(program: &str, source: io::Error) -> Self {
        let program = program.to_string();
        match source.kind() {
            io::ErrorKind::NotFound => HandoffError::NotFound { program, source },
            _ => HandoffError::Start { program, source },
        }
    }

    /// Shell-compatible exit status: 127 not found, 126 not startable.
    pub fn exit_code(&self) -> u8 {
        match self {
            HandoffError::NotFound { .. } => 127,
            HandoffError::Start { .. } => 126,
        }
    }
}

fn std_command(spec: &CommandSpec) -> Command {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .envs(spec.env.iter().map(|(k, v)| (k, v)));
    cmd
}

/// Replace the current process with `spec`.
///
/// Returns only if the replacement failed.
#[cfg(unix)]
pub fn exec(spec: &CommandSpec) -> HandoffError {
    use std::os::unix::process::CommandExt;

    let source = std_command(spec).exec();
    HandoffError::from_io(&spec.program, source)
}

/// Run `spec` in the foreground and exit with its status.
///
/// Returns only if the server could not be started.
#[cfg(not(unix))]
pub fn exec(spec: &CommandSpec) -> HandoffError {
    match std_command(spec).status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(source) => HandoffError::from_io(&spec.program, source),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn test_missing_program_is_not_found() {
        let err = exec(&CommandSpec::new("/no/such/gunicorn").arg("app.wsgi"));
        assert!(matches!(err, HandoffError::NotFound { .. }));
        assert_eq!(err.exit_code(), 127);
        assert!(err.to_string().contains("/no/such/gunicorn"));
    }

    #[test]
    fn test_non_executable_is_start_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gunicorn");
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let err = exec(&CommandSpec::new(path.to_string_lossy()));
        assert!(matches!(err, HandoffError::Start { .. }));
        assert_eq!(err.exit_code(), 126);
    }
}
