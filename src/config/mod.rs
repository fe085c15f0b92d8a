//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → loader.rs (name lookup, blank → default)
//!     → validation.rs (positive integers, booleans)
//!     → RunConfig (resolved once, immutable)
//!     → passed by reference to the orchestrator
//! ```
//!
//! # Design Decisions
//! - Environment variables are the only configuration surface
//! - Set-but-empty is the same as unset
//! - Any malformed value is fatal before a single command runs

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from, load_from_env};
pub use schema::{CommandProfile, ReadinessConfig, RunConfig, ServerConfig};
pub use validation::ConfigError;
