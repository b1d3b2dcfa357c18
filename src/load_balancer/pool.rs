//! Backend pool with round-robin rotation.
//!
//! # Responsibilities
//! - Own the ordered backend sequence for one routing key
//! - Advance the persistent rotation cursor, one step per selection
//!
//! # Design Decisions
//! - Cursor stays within `[0, len)` and survives across requests
//! - Advancement uses a CAS loop; no lock is held around probing or
//!   forwarding
//! - Construction rejects empty pools (startup error, not runtime)

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::ConfigError;
use crate::load_balancer::backend::Backend;

/// Ordered, rotating collection of backends behind one routing key.
#[derive(Debug)]
pub struct Pool {
    backends: Vec<Arc<Backend>>,
    cursor: AtomicUsize,
}

impl Pool {
    /// Create a pool for the named group. Fails on an empty backend list.
    pub fn new(group: &str, backends: Vec<Arc<Backend>>) -> Result<Self, ConfigError> {
        if backends.is_empty() {
            return Err(ConfigError::EmptyPool {
                group: group.to_string(),
            });
        }
        Ok(Self {
            backends,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Return the backend under the cursor and advance the cursor by one,
    /// modulo the pool length. Every call advances exactly one step; the
    /// advance is observable by the next caller.
    pub fn next(&self) -> Arc<Backend> {
        let len = self.backends.len();
        let mut current = self.cursor.load(Ordering::Relaxed);
        loop {
            let advanced = (current + 1) % len;
            match self.cursor.compare_exchange_weak(
                current,
                advanced,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return self.backends[current].clone(),
                Err(observed) => current = observed,
            }
        }
    }

    /// Number of backends; also the per-request bound on rotation steps.
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Always false: construction rejects empty pools.
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Backends in rotation order (for the background prober).
    pub fn backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }
}
