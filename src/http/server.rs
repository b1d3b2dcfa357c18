//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router: every path and every HTTP method goes to the
//!   single dispatcher entry point
//! - Wire up middleware (tracing, request ID)
//! - Spawn the background health refresher in cached mode
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body, extract::State, http::Request, response::Response, routing::any, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::{ProbeMode, ProxyConfig};
use crate::error::ConfigError;
use crate::health::cache::{CachedHealth, HealthRefresher};
use crate::health::prober::InlineProber;
use crate::health::HealthCheck;
use crate::http::request::RequestIdLayer;
use crate::proxy::dispatcher::Dispatcher;
use crate::proxy::forward::HttpForwarder;
use crate::routing::Router as ProxyRouter;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// HTTP server for the load balancer.
pub struct HttpServer {
    app: Router,
    refresher: Option<HealthRefresher>,
}

impl HttpServer {
    /// Build the server and its pipeline from validated configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ConfigError> {
        let proxy_router = Arc::new(ProxyRouter::from_config(&config)?);

        let hc = &config.health_check;
        let (prober, refresher): (Arc<dyn HealthCheck>, Option<HealthRefresher>) = match hc.mode {
            ProbeMode::Inline => (Arc::new(InlineProber::new(hc)), None),
            ProbeMode::Cached => {
                let cached = Arc::new(CachedHealth::new(
                    InlineProber::new(hc),
                    Duration::from_secs(hc.cache_ttl_secs),
                ));
                let refresher = HealthRefresher::new(
                    cached.clone(),
                    proxy_router.backends(),
                    Duration::from_secs(hc.refresh_interval_secs),
                );
                (cached, Some(refresher))
            }
        };

        let dispatcher = Arc::new(Dispatcher::new(
            proxy_router,
            prober,
            Arc::new(HttpForwarder::new()),
        ));
        let app = Self::build_router(AppState { dispatcher });

        Ok(Self { app, refresher })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener, until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        if let Some(refresher) = self.refresher {
            let refresher_shutdown = shutdown.resubscribe();
            tokio::spawn(async move {
                refresher.run(refresher_shutdown).await;
            });
        }

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Single entry point: every path, every method.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    state.dispatcher.handle(request).await
}
