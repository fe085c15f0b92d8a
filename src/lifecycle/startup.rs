//! Startup orchestration.
//!
//! # Stages
//! ```text
//! RESOLVING_CONFIG → AWAITING_DEPENDENCY (loop) → PREPARING_ASSETS → SERVING
//! ```
//!
//! `SERVING` is never returned from: the orchestrator becomes the server.
//!
//! # Failure Policy
//! - Config resolution: fatal, nothing has run yet
//! - Dependency readiness: retried; exhaustion proceeds unless fail-closed
//! - Asset preparation: logged and discarded
//! - Handoff: fatal

use std::fmt;
use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::config::{self, ConfigError, RunConfig};
use crate::process::command;
use crate::process::handoff::{self, HandoffError};
use crate::process::{CommandRunner, CommandSpec, CommandStatus, SystemRunner};
use crate::resilience::{wait_for_dependency, DependencyNotReady, ReadinessOutcome};

/// Orchestrator stage, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolvingConfig,
    AwaitingDependency,
    PreparingAssets,
    Serving,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ResolvingConfig => "RESOLVING_CONFIG",
            Stage::AwaitingDependency => "AWAITING_DEPENDENCY",
            Stage::PreparingAssets => "PREPARING_ASSETS",
            Stage::Serving => "SERVING",
        };
        f.write_str(name)
    }
}

fn enter(stage: Stage) {
    tracing::info!(%stage, "Entering stage");
}

/// Fatal startup failure. Each kind maps to a distinct exit status.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    DependencyNotReady(#[from] DependencyNotReady),

    #[error("handoff failed: {0}")]
    Handoff(#[from] HandoffError),

    #[error("failed to render startup plan: {0}")]
    Plan(#[from] serde_json::Error),
}

impl StartupError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            // EX_CONFIG
            StartupError::Config(_) => 78,
            // EX_UNAVAILABLE
            StartupError::DependencyNotReady(_) => 69,
            StartupError::Handoff(e) => e.exit_code(),
            StartupError::Plan(_) => 1,
        }
    }
}

/// Static asset preparation failed. Never fatal.
#[derive(Debug, Error)]
pub enum AssetPreparationError {
    #[error("asset command finished with {0}")]
    Status(CommandStatus),

    #[error("asset command could not be started: {0}")]
    Spawn(#[from] io::Error),
}

/// Everything the orchestrator would run, in order.
#[derive(Debug, Clone, Serialize)]
pub struct StartupPlan<'a> {
    pub config: &'a RunConfig,
    pub readiness_check: CommandSpec,
    pub asset_preparation: CommandSpec,
    pub server: CommandSpec,
}

/// Drives one instance from "just started" to "serving".
#[derive(Debug)]
pub struct Orchestrator<R> {
    config: RunConfig,
    runner: R,
}

impl<R: CommandRunner> Orchestrator<R> {
    pub fn new(config: RunConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn plan(&self) -> StartupPlan<'_> {
        StartupPlan {
            config: &self.config,
            readiness_check: command::migrate(&self.config),
            asset_preparation: command::collect_static(&self.config),
            server: command::serve(&self.config),
        }
    }

    /// Await the dependency and stage assets.
    ///
    /// Returns the server command to hand off to. Fails only when the
    /// dependency never became ready under a fail-closed policy.
    pub async fn prepare(&self) -> Result<CommandSpec, StartupError> {
        enter(Stage::AwaitingDependency);
        let check = command::migrate(&self.config);
        let policy = &self.config.readiness;

        match wait_for_dependency(&self.runner, &check, policy).await {
            ReadinessOutcome::Ready { attempts, waited } => {
                tracing::info!(attempts, waited_secs = waited.as_secs(), "Dependency is ready");
            }
            ReadinessOutcome::Exhausted {
                attempts,
                waited,
                last_failure,
            } => {
                if !policy.fail_open {
                    return Err(DependencyNotReady {
                        attempts,
                        last_failure,
                    }
                    .into());
                }
                tracing::warn!(
                    attempts,
                    waited_secs = waited.as_secs(),
                    %last_failure,
                    "Dependency never became ready; starting degraded"
                );
            }
        }

        enter(Stage::PreparingAssets);
        // Best effort: the only place this error is looked at.
        if let Err(e) = self.prepare_assets().await {
            tracing::warn!(error = %e, "Asset preparation failed; continuing");
        }

        Ok(command::serve(&self.config))
    }

    /// Run the static asset command once.
    pub async fn prepare_assets(&self) -> Result<(), AssetPreparationError> {
        let spec = command::collect_static(&self.config);
        tracing::info!(command = %spec, "Preparing static assets");

        let status = self.runner.run(&spec).await?;
        if !status.success() {
            return Err(AssetPreparationError::Status(status));
        }
        Ok(())
    }

    /// Become the server. Returns only on failure.
    pub fn handoff(&self, server: &CommandSpec) -> HandoffError {
        enter(Stage::Serving);
        tracing::info!(
            command = %server,
            bind = self.config.server.bind_address(),
            workers = self.config.server.workers,
            threads = self.config.server.threads,
            timeout_secs = self.config.server.timeout_secs,
            "Handing off to application server"
        );
        handoff::exec(server)
    }

    /// Prepare, then hand off. Returns only on failure.
    pub async fn run(self) -> StartupError {
        match self.prepare().await {
            Ok(server) => self.handoff(&server).into(),
            Err(e) => e,
        }
    }
}

/// Resolve configuration from `lookup` and run with `runner`.
///
/// `Ok(())` only for a dry run; otherwise this returns only on failure.
pub async fn run_with<F, R>(lookup: F, runner: R) -> Result<(), StartupError>
where
    F: Fn(&str) -> Option<String>,
    R: CommandRunner,
{
    enter(Stage::ResolvingConfig);
    let config = config::load_from(lookup)?;
    start(config, runner).await
}

/// Production entry: real environment, real processes.
pub async fn run() -> Result<(), StartupError> {
    enter(Stage::ResolvingConfig);
    let config = config::load_from_env()?;
    start(config, SystemRunner).await
}

async fn start<R: CommandRunner>(config: RunConfig, runner: R) -> Result<(), StartupError> {
    tracing::info!(
        settings_module = %config.settings_module,
        max_tries = config.readiness.max_tries,
        fail_open = config.readiness.fail_open,
        workers = config.server.workers,
        threads = config.server.threads,
        timeout_secs = config.server.timeout_secs,
        bind = config.server.bind_address(),
        "Configuration resolved"
    );
    if config.readiness.fail_open {
        tracing::debug!("Readiness is fail-open: exhausted retries will not stop startup");
    }

    let orchestrator = Orchestrator::new(config, runner);

    if orchestrator.config().dry_run {
        let plan = serde_json::to_string_pretty(&orchestrator.plan())?;
        println!("{}", plan);
        tracing::info!("Dry run complete; nothing executed");
        return Ok(());
    }

    Err(orchestrator.run().await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::ResolvingConfig.to_string(), "RESOLVING_CONFIG");
        assert_eq!(Stage::Serving.to_string(), "SERVING");
    }

    #[test]
    fn test_exit_codes() {
        let config = StartupError::from(ConfigError::NotPositiveInteger {
            var: "WORKERS",
            value: "abc".into(),
        });
        assert_eq!(config.exit_code(), 78);

        let handoff = StartupError::from(HandoffError::NotFound {
            program: "gunicorn".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        });
        assert_eq!(handoff.exit_code(), 127);
    }

    #[test]
    fn test_plan_serializes() {
        let orchestrator = Orchestrator::new(RunConfig::default(), SystemRunner);
        let json = serde_json::to_value(orchestrator.plan()).unwrap();
        assert_eq!(json["server"]["program"], "gunicorn");
        assert_eq!(json["config"]["server"]["workers"], 3);
        assert_eq!(json["readiness_check"]["args"][1], "migrate");
    }
}
