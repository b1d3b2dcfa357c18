//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the load balancer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend server definitions. When no routes are configured, all
    /// backends form one shared pool (flat shape).
    pub backends: Vec<BackendConfig>,

    /// Exact-path routes to backend groups (multi-group shape).
    pub routes: Vec<RouteConfig>,

    /// Health probing settings.
    pub health_check: HealthCheckConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Backend server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Backend identifier for logging.
    pub name: String,

    /// Backend group this server belongs to.
    #[serde(default = "default_group")]
    pub group: String,

    /// Backend address as an absolute URL (e.g., "http://127.0.0.1:3000").
    pub address: String,

    /// Health check sub-path for this backend. Falls back to
    /// `health_check.path` when unset; an empty string disables probing for
    /// this backend, which is then always considered healthy.
    pub health_check_path: Option<String>,
}

fn default_group() -> String {
    "default".to_string()
}

/// Route configuration binding an exact request path to a backend group.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Request path to match. Exact string equality, no prefixes or patterns.
    pub path: String,

    /// Backend group to forward to.
    pub group: String,
}

/// Probe scheduling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProbeMode {
    /// Probe candidates inline while handling the request.
    #[default]
    Inline,
    /// Answer from a TTL cache refreshed by a background prober.
    Cached,
}

/// Health probing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Probe scheduling policy.
    pub mode: ProbeMode,

    /// Shared health check sub-path for backends without their own.
    /// When neither this nor a per-backend path is set, probing is disabled.
    pub path: Option<String>,

    /// Probe attempts per health evaluation.
    pub attempts: u32,

    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,

    /// Delay after a failed attempt in seconds.
    pub retry_delay_secs: u64,

    /// Background refresh interval in seconds (cached mode).
    pub refresh_interval_secs: u64,

    /// Cache entry TTL in seconds (cached mode).
    pub cache_ttl_secs: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            mode: ProbeMode::Inline,
            path: None,
            attempts: 3,
            timeout_secs: 5,
            retry_delay_secs: 1,
            refresh_interval_secs: 10,
            cache_ttl_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
