//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference existing groups)
//! - Validate addresses and probe settings
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the deserialized config
//! - Runs before the config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic validation failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    BindAddress(String),

    #[error("no backends configured")]
    NoBackends,

    #[error("backend {name:?}: address {address:?} is not an absolute http(s) URL with a host")]
    BackendAddress { name: String, address: String },

    #[error("route {path:?} references unknown backend group {group:?}")]
    RouteGroup { path: String, group: String },

    #[error("route path {0:?} must begin with '/'")]
    RoutePath(String),

    #[error("health_check.attempts must be at least 1")]
    ProbeAttempts,
}

/// Validate a deserialized configuration, collecting every failure.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.backends.is_empty() {
        errors.push(ValidationError::NoBackends);
    }

    for backend in &config.backends {
        match Url::parse(&backend.address) {
            Ok(url) if url.has_host() && matches!(url.scheme(), "http" | "https") => {}
            _ => errors.push(ValidationError::BackendAddress {
                name: backend.name.clone(),
                address: backend.address.clone(),
            }),
        }
    }

    let groups: HashSet<&str> = config.backends.iter().map(|b| b.group.as_str()).collect();
    for route in &config.routes {
        if !route.path.starts_with('/') {
            errors.push(ValidationError::RoutePath(route.path.clone()));
        }
        if !groups.contains(route.group.as_str()) {
            errors.push(ValidationError::RouteGroup {
                path: route.path.clone(),
                group: route.group.clone(),
            });
        }
    }

    if config.health_check.attempts == 0 {
        errors.push(ValidationError::ProbeAttempts);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
