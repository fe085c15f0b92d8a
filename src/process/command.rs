//! Sub-command construction.
//!
//! Turns a [`RunConfig`] into the three external invocations the
//! orchestrator knows about. Nothing here runs anything.

use std::fmt;

use serde::Serialize;

use crate::config::schema::{RunConfig, SERVER_LOG_LEVEL};

/// Environment variable every sub-command receives the settings module in.
pub const SETTINGS_ENV_VAR: &str = "DJANGO_SETTINGS_MODULE";

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    /// Program name or path.
    pub program: String,
    /// Arguments, not including the program.
    pub args: Vec<String>,
    /// Extra environment on top of the inherited one.
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

fn manage(config: &RunConfig, subcommand: &str) -> CommandSpec {
    CommandSpec::new(&config.commands.python)
        .arg(&config.commands.manage_script)
        .arg(subcommand)
        .arg("--noinput")
        .arg(format!("--settings={}", config.settings_module))
        .env(SETTINGS_ENV_VAR, &config.settings_module)
}

/// Dependency readiness check: apply pending schema migrations.
pub fn migrate(config: &RunConfig) -> CommandSpec {
    manage(config, "migrate")
}

/// Static asset staging.
pub fn collect_static(config: &RunConfig) -> CommandSpec {
    manage(config, "collectstatic")
}

/// The long-running application server.
pub fn serve(config: &RunConfig) -> CommandSpec {
    let server = &config.server;
    CommandSpec::new(&config.commands.server_bin)
        .arg(&config.commands.wsgi_app)
        .arg("--bind")
        .arg(server.bind_address())
        .arg("--workers")
        .arg(server.workers.to_string())
        .arg("--threads")
        .arg(server.threads.to_string())
        .arg("--timeout")
        .arg(server.timeout_secs.to_string())
        .arg("--log-level")
        .arg(SERVER_LOG_LEVEL)
        .env(SETTINGS_ENV_VAR, &config.settings_module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_command() {
        let config = RunConfig::default();
        let cmd = migrate(&config);
        assert_eq!(
            cmd.to_string(),
            "python manage.py migrate --noinput --settings=app.settings"
        );
        assert_eq!(
            cmd.env,
            vec![("DJANGO_SETTINGS_MODULE".to_string(), "app.settings".to_string())]
        );
    }

    #[test]
    fn test_collect_static_command() {
        let config = RunConfig::default();
        assert_eq!(
            collect_static(&config).to_string(),
            "python manage.py collectstatic --noinput --settings=app.settings"
        );
    }

    #[test]
    fn test_serve_uses_resolved_concurrency() {
        let mut config = RunConfig::default();
        config.server.workers = 5;
        config.server.threads = 4;
        config.server.timeout_secs = 30;

        assert_eq!(
            serve(&config).to_string(),
            "gunicorn app.wsgi:application --bind 0.0.0.0:80 --workers 5 --threads 4 \
             --timeout 30 --log-level info"
        );
    }
}
