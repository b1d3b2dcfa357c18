//! Health probing subsystem.
//!
//! # Data Flow
//! ```text
//! Inline policy (prober.rs):
//!     Dispatcher asks per candidate
//!     → bounded-retry GET probe, blocking that request only
//!     → true/false
//!
//! Cached policy (cache.rs):
//!     Dispatcher reads a TTL cache, off the probe path entirely
//!     ← background refresher re-probes every backend on an interval
//! ```
//!
//! # Design Decisions
//! - Probe scheduling is an explicit policy behind a trait, selected in config
//! - Success is strictly status 200; anything else is a failed attempt
//! - A backend without a probe target is always healthy (probing is opt-in)
//! - Inline results are never cached across invocations

pub mod cache;
pub mod prober;

use async_trait::async_trait;

use crate::load_balancer::Backend;

/// Liveness evaluation for one backend candidate.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn is_healthy(&self, backend: &Backend) -> bool;
}
