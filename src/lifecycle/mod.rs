//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main):
//!     Load config → Validate → Build pipeline → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → broadcast signal → stop accepting, refresher exits
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - One broadcast channel fans the signal out to every long-running task

pub mod shutdown;

pub use shutdown::Shutdown;
