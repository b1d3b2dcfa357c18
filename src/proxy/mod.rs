//! Proxy pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! Request
//!     → dispatcher.rs (resolve pool → rotate → probe → pick first healthy)
//!     → forward.rs (rewrite target, relay bytes upstream)
//!     → Response (or the unified 503 on exhaustion / no route)
//! ```
//!
//! # Design Decisions
//! - The forwarding transport sits behind a trait so the dispatch loop can
//!   be exercised without a network
//! - Probe failures become rotation decisions; only total exhaustion
//!   crosses the boundary to the client

pub mod dispatcher;
pub mod forward;

pub use dispatcher::Dispatcher;
pub use forward::{Forward, HttpForwarder};
