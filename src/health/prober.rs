//! Inline health probing with bounded retries.
//!
//! # Responsibilities
//! - Issue plain GET probes against a backend's probe target
//! - Retry up to the configured attempt count, pausing after each failure
//!
//! # Design Decisions
//! - No custom headers on the probe request
//! - A timed-out attempt counts the same as a transport error
//! - Worst case per evaluation: attempts × (timeout + retry delay)

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::health::HealthCheck;
use crate::load_balancer::Backend;

/// Probes a backend inline, holding up only the request being handled.
pub struct InlineProber {
    client: Client<HttpConnector, Body>,
    attempts: u32,
    timeout: Duration,
    retry_delay: Duration,
}

impl InlineProber {
    pub fn new(config: &HealthCheckConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            client,
            attempts: config.attempts,
            timeout: Duration::from_secs(config.timeout_secs),
            retry_delay: Duration::from_secs(config.retry_delay_secs),
        }
    }

    /// One GET against the probe target. Succeeds iff the request completes
    /// without a transport error and the status is exactly 200.
    async fn attempt(&self, probe_uri: &Uri) -> bool {
        let request = match Request::builder()
            .method("GET")
            .uri(probe_uri.clone())
            .body(Body::empty())
        {
            Ok(request) => request,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build health probe request");
                return false;
            }
        };

        match time::timeout(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) => response.status() == StatusCode::OK,
            Ok(Err(_)) | Err(_) => false,
        }
    }
}

#[async_trait]
impl HealthCheck for InlineProber {
    async fn is_healthy(&self, backend: &Backend) -> bool {
        let Some(probe_uri) = backend.probe_uri() else {
            return true;
        };

        for attempt in 1..=self.attempts {
            if self.attempt(probe_uri).await {
                return true;
            }
            tracing::debug!(
                backend = %backend.authority(),
                attempt,
                "Health probe attempt failed"
            );
            // The delay applies after every failed attempt, the last included.
            time::sleep(self.retry_delay).await;
        }

        tracing::warn!(
            backend = %backend.authority(),
            attempts = self.attempts,
            "Backend failed all health probe attempts"
        );
        false
    }
}
