//! Cached health state with a background refresher.
//!
//! # Responsibilities
//! - Answer health queries from a read-mostly TTL cache
//! - Re-probe every backend on a fixed interval, off the request path
//!
//! # Design Decisions
//! - Missing or expired entries count as healthy until the refresher
//!   reports; traffic keeps flowing while the first probe round runs
//! - Keyed by backend authority; backends without a probe target are
//!   never cached

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::time;

use crate::health::prober::InlineProber;
use crate::health::HealthCheck;
use crate::load_balancer::Backend;
use crate::observability::metrics;

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    healthy: bool,
    checked_at: Instant,
}

/// TTL cache over probe results.
pub struct CachedHealth {
    prober: InlineProber,
    cache: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl CachedHealth {
    pub fn new(prober: InlineProber, ttl: Duration) -> Self {
        Self {
            prober,
            cache: DashMap::new(),
            ttl,
        }
    }

    /// Re-probe one backend and record the result.
    async fn refresh(&self, backend: &Backend) {
        let healthy = self.prober.is_healthy(backend).await;
        self.cache.insert(
            backend.authority().to_string(),
            CacheEntry {
                healthy,
                checked_at: Instant::now(),
            },
        );
        metrics::record_backend_health(backend.authority(), healthy);
    }
}

#[async_trait]
impl HealthCheck for CachedHealth {
    async fn is_healthy(&self, backend: &Backend) -> bool {
        if backend.probe_uri().is_none() {
            return true;
        }
        match self.cache.get(backend.authority()) {
            Some(entry) if entry.checked_at.elapsed() < self.ttl => entry.healthy,
            _ => true,
        }
    }
}

/// Background task re-probing all backends on a fixed interval.
pub struct HealthRefresher {
    health: Arc<CachedHealth>,
    backends: Vec<Arc<Backend>>,
    interval: Duration,
}

impl HealthRefresher {
    pub fn new(health: Arc<CachedHealth>, backends: Vec<Arc<Backend>>, interval: Duration) -> Self {
        Self {
            health,
            backends,
            interval,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            backends = self.backends.len(),
            "Health refresher starting"
        );

        let mut ticker = time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh_all().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health refresher received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    async fn refresh_all(&self) {
        for backend in &self.backends {
            if backend.probe_uri().is_some() {
                self.health.refresh(backend).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HealthCheckConfig;

    fn cached(ttl: Duration) -> CachedHealth {
        CachedHealth::new(InlineProber::new(&HealthCheckConfig::default()), ttl)
    }

    fn probed_backend() -> Backend {
        Backend::new("http://127.0.0.1:1", Some("/health")).unwrap()
    }

    #[tokio::test]
    async fn unknown_backend_counts_as_healthy() {
        let health = cached(Duration::from_secs(30));
        assert!(health.is_healthy(&probed_backend()).await);
    }

    #[tokio::test]
    async fn fresh_entry_is_authoritative() {
        let health = cached(Duration::from_secs(30));
        let backend = probed_backend();
        health.cache.insert(
            backend.authority().to_string(),
            CacheEntry {
                healthy: false,
                checked_at: Instant::now(),
            },
        );

        assert!(!health.is_healthy(&backend).await);
    }

    #[tokio::test]
    async fn expired_entry_falls_back_to_healthy() {
        let health = cached(Duration::from_millis(0));
        let backend = probed_backend();
        health.cache.insert(
            backend.authority().to_string(),
            CacheEntry {
                healthy: false,
                checked_at: Instant::now(),
            },
        );

        assert!(health.is_healthy(&backend).await);
    }

    #[tokio::test]
    async fn backend_without_probe_target_bypasses_the_cache() {
        let health = cached(Duration::from_secs(30));
        let backend = Backend::new("http://127.0.0.1:1", None).unwrap();
        health.cache.insert(
            backend.authority().to_string(),
            CacheEntry {
                healthy: false,
                checked_at: Instant::now(),
            },
        );

        assert!(health.is_healthy(&backend).await);
    }
}
