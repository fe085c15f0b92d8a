//! Configuration schema definitions.
//!
//! This module defines the resolved configuration for one startup run.
//! Every field has a default so an empty environment is a valid input.

use std::time::Duration;

use serde::Serialize;

/// Address the application server binds to. Not configurable.
pub const BIND_ADDRESS: &str = "0.0.0.0:80";

/// Log level handed to the application server. Not configurable.
pub const SERVER_LOG_LEVEL: &str = "info";

/// Settings identifier used when neither settings variable is set.
pub const DEFAULT_SETTINGS_MODULE: &str = "app.settings";

/// Resolved configuration snapshot for one execution.
///
/// Built once from the environment by [`crate::config::loader`] and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    /// Application settings identifier passed to every sub-command.
    pub settings_module: String,

    /// Dependency readiness policy.
    pub readiness: ReadinessConfig,

    /// Application server concurrency.
    pub server: ServerConfig,

    /// Programs used to build the sub-commands.
    pub commands: CommandProfile,

    /// Print the resolved plan and exit instead of running anything.
    pub dry_run: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            settings_module: DEFAULT_SETTINGS_MODULE.to_string(),
            readiness: ReadinessConfig::default(),
            server: ServerConfig::default(),
            commands: CommandProfile::default(),
            dry_run: false,
        }
    }
}

/// Dependency readiness retry policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessConfig {
    /// Maximum number of readiness command invocations.
    pub max_tries: u32,

    /// Proceed to serve when every attempt failed (degraded start).
    pub fail_open: bool,

    /// Delay multiplied by `2^(attempt-1)` between attempts.
    pub base_delay_secs: u64,

    /// Upper bound for a single backoff sleep, if any.
    pub max_delay_secs: Option<u64>,
}

impl ReadinessConfig {
    /// Base delay as a [`Duration`].
    pub fn base_delay(&self) -> Duration {
        Duration::from_secs(self.base_delay_secs)
    }

    /// Backoff cap as a [`Duration`].
    pub fn max_delay(&self) -> Option<Duration> {
        self.max_delay_secs.map(Duration::from_secs)
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            max_tries: 6,
            fail_open: true,
            base_delay_secs: 1,
            max_delay_secs: None,
        }
    }
}

/// Application server concurrency settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerConfig {
    /// Worker process count.
    pub workers: u32,

    /// Threads per worker.
    pub threads: u32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Bind address for the server. Always all interfaces, port 80.
    pub fn bind_address(&self) -> &'static str {
        BIND_ADDRESS
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            threads: 2,
            timeout_secs: 120,
        }
    }
}

/// Programs the orchestrator shells out to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandProfile {
    /// Interpreter running the management script.
    pub python: String,

    /// Management script (migrations, static assets).
    pub manage_script: String,

    /// Application server executable.
    pub server_bin: String,

    /// WSGI application target handed to the server.
    pub wsgi_app: String,
}

impl Default for CommandProfile {
    fn default() -> Self {
        Self {
            python: "python".to_string(),
            manage_script: "manage.py".to_string(),
            server_bin: "gunicorn".to_string(),
            wsgi_app: "app.wsgi:application".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.settings_module, "app.settings");
        assert_eq!(config.readiness.max_tries, 6);
        assert!(config.readiness.fail_open);
        assert_eq!(config.server.workers, 3);
        assert_eq!(config.server.threads, 2);
        assert_eq!(config.server.timeout_secs, 120);
        assert_eq!(config.server.bind_address(), "0.0.0.0:80");
        assert!(!config.dry_run);
    }
}
