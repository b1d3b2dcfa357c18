//! Forwarding transport.
//!
//! # Responsibilities
//! - Rewrite the request target for the chosen backend
//! - Relay request and response bytes upstream

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

use crate::error::ForwardError;
use crate::load_balancer::Backend;

/// Relays one request to a chosen backend.
#[async_trait]
pub trait Forward: Send + Sync {
    async fn forward(
        &self,
        request: Request<Body>,
        backend: &Backend,
    ) -> Result<Response<Body>, ForwardError>;
}

/// Prepend the backend's authority to the request path.
///
/// `/app1` forwarded to `10.0.0.1:8081` becomes `/10.0.0.1:8081/app1`. The
/// duplicated address segment is part of the upstream wire contract and is
/// produced exactly, byte for byte.
pub fn rewrite_path(authority: &str, path: &str) -> String {
    format!("/{authority}{path}")
}

/// Production forwarder over the legacy hyper client.
pub struct HttpForwarder {
    client: Client<HttpConnector, Body>,
}

impl HttpForwarder {
    pub fn new() -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build(HttpConnector::new()),
        }
    }
}

impl Default for HttpForwarder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Forward for HttpForwarder {
    async fn forward(
        &self,
        request: Request<Body>,
        backend: &Backend,
    ) -> Result<Response<Body>, ForwardError> {
        let (mut parts, body) = request.into_parts();

        let rewritten = rewrite_path(backend.authority(), parts.uri.path());
        let path_and_query = match parts.uri.query() {
            Some(query) => format!("{rewritten}?{query}"),
            None => rewritten,
        };

        parts.uri = Uri::builder()
            .scheme(backend.scheme())
            .authority(backend.authority())
            .path_and_query(path_and_query)
            .build()?;

        let response = self.client.request(Request::from_parts(parts, body)).await?;
        Ok(response.map(Body::new))
    }
}
