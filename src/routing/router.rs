//! Route lookup and pool construction.
//!
//! # Responsibilities
//! - Map an inbound request path to the pool that should serve it
//! - Build pools from static configuration at startup
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Routes referencing the same group share one pool, and with it the
//!   rotation cursor
//! - No match is reported as `None`; the dispatcher decides the response

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::ProxyConfig;
use crate::error::ConfigError;
use crate::load_balancer::{Backend, Pool};

/// An exact request path bound to a backend pool.
#[derive(Debug)]
pub struct Route {
    pub path: String,
    pub pool: Arc<Pool>,
}

/// Maps request paths to pools.
#[derive(Debug)]
pub enum Router {
    /// Flat shape: one pool serves every request.
    Single(Arc<Pool>),
    /// Multi-group shape: ordered exact-path routes.
    Groups(Vec<Route>),
}

impl Router {
    /// Build the router and its pools from validated configuration.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ConfigError> {
        let shared_probe_path = config.health_check.path.as_deref();

        // Group backends by group name, preserving configuration order both
        // across groups and within each group.
        let mut grouped: Vec<(String, Vec<Arc<Backend>>)> = Vec::new();
        let mut all = Vec::new();
        for bc in &config.backends {
            let probe_path = bc.health_check_path.as_deref().or(shared_probe_path);
            let backend = Arc::new(Backend::new(&bc.address, probe_path)?);
            all.push(backend.clone());
            match grouped.iter_mut().find(|(group, _)| group == &bc.group) {
                Some((_, members)) => members.push(backend),
                None => grouped.push((bc.group.clone(), vec![backend])),
            }
        }

        if config.routes.is_empty() {
            return Ok(Router::Single(Arc::new(Pool::new("default", all)?)));
        }

        let mut pools: Vec<(String, Arc<Pool>)> = Vec::new();
        for (group, members) in grouped {
            let pool = Arc::new(Pool::new(&group, members)?);
            pools.push((group, pool));
        }

        let mut routes = Vec::new();
        for rc in &config.routes {
            let pool = pools
                .iter()
                .find(|(group, _)| group == &rc.group)
                .map(|(_, pool)| pool.clone())
                .ok_or_else(|| ConfigError::UnknownGroup {
                    path: rc.path.clone(),
                    group: rc.group.clone(),
                })?;
            routes.push(Route {
                path: rc.path.clone(),
                pool,
            });
        }

        Ok(Router::Groups(routes))
    }

    /// Resolve the pool for a request path. First exact match wins; at most
    /// one pool services a given request.
    pub fn resolve(&self, request_path: &str) -> Option<&Arc<Pool>> {
        match self {
            Router::Single(pool) => Some(pool),
            Router::Groups(routes) => routes
                .iter()
                .find(|route| route.path == request_path)
                .map(|route| &route.pool),
        }
    }

    /// Every configured backend, deduplicated (for the background prober).
    pub fn backends(&self) -> Vec<Arc<Backend>> {
        match self {
            Router::Single(pool) => pool.backends().to_vec(),
            Router::Groups(routes) => {
                let mut seen = HashSet::new();
                let mut backends = Vec::new();
                for route in routes {
                    for backend in route.pool.backends() {
                        if seen.insert(backend.authority().to_string()) {
                            backends.push(backend.clone());
                        }
                    }
                }
                backends
            }
        }
    }
}
