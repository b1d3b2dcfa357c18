//! Request dispatch orchestration.
//!
//! # Data Flow
//! ```text
//! Routing → Probing(candidate_i)
//!     → Forwarding (terminal success)
//!     | Probing(candidate_i+1)
//!     → Unavailable (terminal failure)
//! ```
//!
//! # Design Decisions
//! - At most `pool.len()` rotation steps per request: every backend is
//!   tried at most once before giving up
//! - Probe failures are absorbed into rotation, never surfaced per candidate
//! - "No route" and "no healthy backend" produce the identical 503 response
//! - A forward error is terminal for the request (502): a candidate already
//!   deemed healthy is not re-routed

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::health::HealthCheck;
use crate::http::X_REQUEST_ID;
use crate::observability::metrics;
use crate::proxy::forward::Forward;
use crate::routing::Router;

/// Fixed response body for "no route" and "no healthy backend" alike.
pub const UNAVAILABLE_BODY: &str = "No healthy backend servers available";

/// Orchestrates routing, rotation, health gating, and forwarding.
pub struct Dispatcher {
    router: Arc<Router>,
    prober: Arc<dyn HealthCheck>,
    forwarder: Arc<dyn Forward>,
}

impl Dispatcher {
    pub fn new(
        router: Arc<Router>,
        prober: Arc<dyn HealthCheck>,
        forwarder: Arc<dyn Forward>,
    ) -> Self {
        Self {
            router,
            prober,
            forwarder,
        }
    }

    /// Handle one request end to end.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let method = request.method().to_string();
        let path = request.uri().path().to_string();
        let request_id = request
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let Some(pool) = self.router.resolve(&path) else {
            tracing::warn!(request_id = %request_id, path = %path, "No route matched");
            metrics::record_request(&method, StatusCode::SERVICE_UNAVAILABLE.as_u16(), "none", start);
            return unavailable();
        };

        for _ in 0..pool.len() {
            let candidate = pool.next();
            if !self.prober.is_healthy(&candidate).await {
                tracing::debug!(
                    request_id = %request_id,
                    backend = %candidate.authority(),
                    "Skipping unhealthy backend"
                );
                continue;
            }

            tracing::debug!(
                request_id = %request_id,
                backend = %candidate.authority(),
                path = %path,
                "Forwarding request"
            );
            return match self.forwarder.forward(request, &candidate).await {
                Ok(response) => {
                    metrics::record_request(
                        &method,
                        response.status().as_u16(),
                        candidate.authority(),
                        start,
                    );
                    response
                }
                Err(e) => {
                    tracing::error!(
                        request_id = %request_id,
                        backend = %candidate.authority(),
                        error = %e,
                        "Upstream request failed"
                    );
                    metrics::record_request(
                        &method,
                        StatusCode::BAD_GATEWAY.as_u16(),
                        candidate.authority(),
                        start,
                    );
                    (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
                }
            };
        }

        tracing::warn!(request_id = %request_id, path = %path, "All backends exhausted");
        metrics::record_request(&method, StatusCode::SERVICE_UNAVAILABLE.as_u16(), "none", start);
        unavailable()
    }
}

/// The unified 503 for unmatched routes and exhausted pools.
fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, UNAVAILABLE_BODY).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackendConfig, ProxyConfig, RouteConfig};
    use crate::error::ForwardError;
    use crate::load_balancer::Backend;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Prober considering only the listed authorities healthy.
    struct FixedHealth {
        healthy: Vec<&'static str>,
    }

    #[async_trait]
    impl HealthCheck for FixedHealth {
        async fn is_healthy(&self, backend: &Backend) -> bool {
            self.healthy.contains(&backend.authority())
        }
    }

    /// Forwarder answering 200 with the chosen backend's authority.
    #[derive(Default)]
    struct RecordingForwarder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Forward for RecordingForwarder {
        async fn forward(
            &self,
            _request: Request<Body>,
            backend: &Backend,
        ) -> Result<Response<Body>, ForwardError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((StatusCode::OK, backend.authority().to_string()).into_response())
        }
    }

    /// Forwarder that always fails at the transport stage.
    struct FailingForwarder;

    #[async_trait]
    impl Forward for FailingForwarder {
        async fn forward(
            &self,
            _request: Request<Body>,
            _backend: &Backend,
        ) -> Result<Response<Body>, ForwardError> {
            let error = Request::builder()
                .uri("http://[bad")
                .body(Body::empty())
                .unwrap_err();
            Err(ForwardError::Request(error))
        }
    }

    fn flat_router(addresses: &[&str]) -> Arc<Router> {
        let mut config = ProxyConfig::default();
        // The shared probe path marks every candidate as probed; the mock
        // prober decides the outcome.
        config.health_check.path = Some("/health".to_string());
        for (i, address) in addresses.iter().enumerate() {
            config.backends.push(BackendConfig {
                name: format!("b{i}"),
                group: "default".to_string(),
                address: address.to_string(),
                health_check_path: None,
            });
        }
        Arc::new(Router::from_config(&config).unwrap())
    }

    fn dispatcher(
        router: Arc<Router>,
        healthy: Vec<&'static str>,
        forwarder: Arc<dyn Forward>,
    ) -> Dispatcher {
        Dispatcher::new(router, Arc::new(FixedHealth { healthy }), forwarder)
    }

    fn request(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn exhaustion_returns_the_fixed_503() {
        let forwarder = Arc::new(RecordingForwarder::default());
        let dispatcher = dispatcher(
            flat_router(&["http://127.0.0.1:8081", "http://127.0.0.1:8082"]),
            vec![],
            forwarder.clone(),
        );

        let response = dispatcher.handle(request("/")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_string(response).await, UNAVAILABLE_BODY);
        assert_eq!(forwarder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_route_matches_the_exhaustion_outcome() {
        let mut config = ProxyConfig::default();
        config.backends.push(BackendConfig {
            name: "b1".to_string(),
            group: "app1".to_string(),
            address: "http://127.0.0.1:8081".to_string(),
            health_check_path: None,
        });
        config.routes.push(RouteConfig {
            path: "/app1".to_string(),
            group: "app1".to_string(),
        });
        let router = Arc::new(Router::from_config(&config).unwrap());
        let dispatcher = dispatcher(
            router,
            vec!["127.0.0.1:8081"],
            Arc::new(RecordingForwarder::default()),
        );

        let response = dispatcher.handle(request("/unconfigured")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_string(response).await, UNAVAILABLE_BODY);
    }

    #[tokio::test]
    async fn rotation_skips_unhealthy_candidates() {
        let dispatcher = dispatcher(
            flat_router(&["http://127.0.0.1:8081", "http://127.0.0.1:8082"]),
            vec!["127.0.0.1:8082"],
            Arc::new(RecordingForwarder::default()),
        );

        // The cursor starts at 8081; it is probed, skipped, and 8082 serves.
        let response = dispatcher.handle(request("/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "127.0.0.1:8082");
    }

    #[tokio::test]
    async fn healthy_pool_rotates_across_requests() {
        let dispatcher = dispatcher(
            flat_router(&["http://127.0.0.1:8081", "http://127.0.0.1:8082"]),
            vec!["127.0.0.1:8081", "127.0.0.1:8082"],
            Arc::new(RecordingForwarder::default()),
        );

        let first = dispatcher.handle(request("/")).await;
        let second = dispatcher.handle(request("/")).await;
        assert_eq!(body_string(first).await, "127.0.0.1:8081");
        assert_eq!(body_string(second).await, "127.0.0.1:8082");
    }

    #[tokio::test]
    async fn forward_error_becomes_502_without_rerouting() {
        let dispatcher = dispatcher(
            flat_router(&["http://127.0.0.1:8081", "http://127.0.0.1:8082"]),
            vec!["127.0.0.1:8081", "127.0.0.1:8082"],
            Arc::new(FailingForwarder),
        );

        let response = dispatcher.handle(request("/")).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
