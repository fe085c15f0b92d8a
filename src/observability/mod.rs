//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every stage produces:
//!     → logging.rs (structured log events: stage, attempt, wait, resolved parameters)
//!
//! Consumers:
//!     → container runtime log driver (stderr)
//! ```
//!
//! # Design Decisions
//! - Every decision the orchestrator takes is visible in a log line
//! - JSON output for log aggregation, text for humans

pub mod logging;
