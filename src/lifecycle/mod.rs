//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolve config → Await dependency → Prepare assets → exec server
//! ```
//!
//! # Design Decisions
//! - Strictly sequential: one stage at a time, no background tasks
//! - No signal handlers; after exec the server owns the PID
//! - Nothing runs after the handoff

pub mod startup;

pub use startup::{
    run, run_with, AssetPreparationError, Orchestrator, Stage, StartupError, StartupPlan,
};
