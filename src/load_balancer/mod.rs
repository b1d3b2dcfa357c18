//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Route matched → pool identified
//!     → pool.rs (advance the rotation cursor by one)
//!     → dispatcher probes the candidate before forwarding
//!     → unhealthy candidates rotate to the next, at most once around
//! ```
//!
//! # Design Decisions
//! - Rotation state lives on the pool and persists across requests
//! - Cursor advancement is the only cross-request mutation; it is atomic
//! - Backends are immutable after construction; no runtime add/remove

pub mod backend;
pub mod pool;

pub use backend::Backend;
pub use pool::Pool;
