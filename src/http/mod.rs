//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, every path and method → one handler)
//!     → request.rs (assign x-request-id)
//!     → proxy dispatcher (routing, rotation, health gating)
//!     → response relayed to the client
//! ```

pub mod request;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
