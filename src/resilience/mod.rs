//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Readiness check:
//!     → retries.rs (invoke, record failure, decide whether to go again)
//!     → backoff.rs (base * 2^(attempt-1), optional cap)
//!     → tokio::time::sleep
//! ```
//!
//! # Design Decisions
//! - Only the attempt count is bounded; a single check may run indefinitely
//! - Backoff is deterministic, no jitter
//! - Exhaustion is reported, not raised; policy lives with the caller

pub mod backoff;
pub mod retries;

pub use backoff::calculate_backoff;
pub use retries::{wait_for_dependency, AttemptFailure, DependencyNotReady, ReadinessOutcome};
