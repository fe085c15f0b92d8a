//! Container startup orchestrator library.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod process;
pub mod resilience;

pub use config::schema::RunConfig;
pub use lifecycle::{Orchestrator, StartupError};
