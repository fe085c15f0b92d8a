//! External process subsystem.
//!
//! # Data Flow
//! ```text
//! RunConfig
//!     → command.rs (migrate / collectstatic / serve specs)
//!     → runner.rs (spawn, wait, exit status only)
//!     → handoff.rs (exec the server, never returns on success)
//! ```
//!
//! # Design Decisions
//! - Commands are opaque: stdout/stderr are inherited, never parsed
//! - No per-command deadline; only the attempt count is bounded
//! - Handoff replaces the process image instead of supervising a child

pub mod command;
pub mod handoff;
pub mod runner;

pub use command::CommandSpec;
pub use handoff::HandoffError;
pub use runner::{CommandRunner, CommandStatus, SystemRunner};
