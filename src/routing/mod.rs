//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (exact-match lookup over the configured route order)
//!     → Return: matched pool or no match
//!
//! Route compilation (at startup):
//!     BackendConfig[] + RouteConfig[]
//!     → group backends, build pools
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Exact string equality only; no prefixes, no patterns
//! - First match wins over the configured order
//! - The flat shape (no routes) bypasses matching entirely

pub mod router;

pub use router::{Route, Router};
