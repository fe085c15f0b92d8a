//! Dependency readiness retry loop.
//!
//! # Responsibilities
//! - Invoke the readiness command immediately, then after each backoff
//! - Stop on the first success
//! - Stop after `max_tries` invocations, reporting the last failure
//!
//! Whether exhaustion is fatal is the caller's decision; this loop never
//! aborts on its own.

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::config::ReadinessConfig;
use crate::process::{CommandRunner, CommandSpec, CommandStatus};
use crate::resilience::backoff::calculate_backoff;

/// Why one readiness attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The command ran and did not succeed.
    Status(CommandStatus),
    /// The command could not be started.
    Spawn(io::ErrorKind),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::Status(status) => write!(f, "{}", status),
            AttemptFailure::Spawn(kind) => write!(f, "could not start: {}", kind),
        }
    }
}

/// Loop-local retry bookkeeping.
#[derive(Debug, Default)]
struct RetryState {
    attempts: u32,
    last_failure: Option<AttemptFailure>,
}

impl RetryState {
    fn record(&mut self, failure: AttemptFailure) {
        self.attempts += 1;
        self.last_failure = Some(failure);
    }
}

/// Result of waiting for the dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessOutcome {
    /// The readiness command succeeded on invocation number `attempts`.
    Ready { attempts: u32, waited: Duration },
    /// Every one of `attempts` invocations failed.
    Exhausted {
        attempts: u32,
        waited: Duration,
        last_failure: AttemptFailure,
    },
}

impl ReadinessOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, ReadinessOutcome::Ready { .. })
    }

    /// Number of readiness command invocations performed.
    pub fn attempts(&self) -> u32 {
        match self {
            ReadinessOutcome::Ready { attempts, .. } => *attempts,
            ReadinessOutcome::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// Total time spent in backoff sleeps.
    pub fn waited(&self) -> Duration {
        match self {
            ReadinessOutcome::Ready { waited, .. } => *waited,
            ReadinessOutcome::Exhausted { waited, .. } => *waited,
        }
    }
}

/// Readiness exhausted under a fail-closed policy.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("dependency not ready after {attempts} attempts (last failure: {last_failure})")]
pub struct DependencyNotReady {
    pub attempts: u32,
    pub last_failure: AttemptFailure,
}

/// Run `check` until it succeeds or `policy.max_tries` invocations failed.
pub async fn wait_for_dependency<R>(
    runner: &R,
    check: &CommandSpec,
    policy: &ReadinessConfig,
) -> ReadinessOutcome
where
    R: CommandRunner,
{
    let mut state = RetryState::default();
    let mut waited = Duration::ZERO;

    loop {
        let attempt = state.attempts + 1;
        tracing::info!(
            attempt,
            max_tries = policy.max_tries,
            command = %check,
            "Checking dependency readiness"
        );

        match runner.run(check).await {
            Ok(status) if status.success() => {
                tracing::info!(attempt, "Dependency ready");
                return ReadinessOutcome::Ready {
                    attempts: attempt,
                    waited,
                };
            }
            Ok(status) => {
                tracing::warn!(attempt, %status, "Readiness check failed");
                state.record(AttemptFailure::Status(status));
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "Readiness check could not be started");
                state.record(AttemptFailure::Spawn(e.kind()));
            }
        }

        if state.attempts >= policy.max_tries {
            if let Some(last_failure) = state.last_failure {
                return ReadinessOutcome::Exhausted {
                    attempts: state.attempts,
                    waited,
                    last_failure,
                };
            }
        }

        let delay = calculate_backoff(state.attempts, policy.base_delay(), policy.max_delay());
        tracing::info!(
            attempt = state.attempts,
            max_tries = policy.max_tries,
            wait_secs = delay.as_secs(),
            "Dependency not ready, backing off"
        );
        tokio::time::sleep(delay).await;
        waited = waited.saturating_add(delay);
    }
}
