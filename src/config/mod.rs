//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → consumed once at startup to build the router and pools
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; backends and pools are never mutated
//!   structurally after startup
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::load_config;
pub use schema::BackendConfig;
pub use schema::HealthCheckConfig;
pub use schema::ListenerConfig;
pub use schema::ProbeMode;
pub use schema::ProxyConfig;
pub use schema::RouteConfig;
