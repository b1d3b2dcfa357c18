//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single backend server
//! - Precompute the authority segment used by the forwarding rewrite
//! - Precompute the health probe target, when probing is enabled

use axum::http::Uri;
use url::Url;

use crate::error::ConfigError;

/// A single backend server. Immutable after construction.
#[derive(Debug)]
pub struct Backend {
    /// Backend base URL.
    url: Url,
    /// `host[:port]` segment, prepended to forwarded paths.
    authority: String,
    /// Precomputed health probe target; `None` disables probing.
    probe_uri: Option<Uri>,
}

impl Backend {
    /// Create a backend from a configured address and optional probe sub-path.
    ///
    /// Probing is opt-in: with no sub-path (or an empty one) the backend is
    /// always considered healthy. Malformed addresses are startup errors.
    pub fn new(address: &str, health_check_path: Option<&str>) -> Result<Self, ConfigError> {
        let url = Url::parse(address).map_err(|e| ConfigError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })?;

        let host = url.host_str().ok_or_else(|| ConfigError::InvalidAddress {
            address: address.to_string(),
            reason: "missing host".to_string(),
        })?;
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let probe_uri = match health_check_path {
            Some(path) if !path.is_empty() => {
                let target = format!("{}{}", address.trim_end_matches('/'), path);
                let uri = target
                    .parse::<Uri>()
                    .map_err(|e| ConfigError::InvalidAddress {
                        address: target,
                        reason: e.to_string(),
                    })?;
                Some(uri)
            }
            _ => None,
        };

        Ok(Self {
            url,
            authority,
            probe_uri,
        })
    }

    /// URL scheme of the backend ("http" or "https").
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// `host[:port]` segment of the backend address.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Health probe target, if probing is enabled for this backend.
    pub fn probe_uri(&self) -> Option<&Uri> {
        self.probe_uri.as_ref()
    }
}
