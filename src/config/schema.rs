//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (socket mode only).
    pub listener: ListenerConfig,

    /// Event translation settings shared by both hosting modes.
    pub adapter: AdapterConfig,

    /// Invocation runtime settings (events mode only).
    pub runtime: RuntimeConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,

    /// Largest request body buffered before the handler runs.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
            max_body_bytes: 6 * 1024 * 1024, // matches the synchronous invocation payload cap
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Event translation settings.
///
/// Built once, normalized by [`AdapterConfig::normalized`] when the adapter is
/// constructed, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Path prefix stripped from incoming paths before dispatch.
    pub base_path: String,

    /// Content-type prefixes whose responses are base64 encoded on the wire.
    pub binary_content_types: Vec<String>,

    /// Join multi-value request headers with a comma instead of keeping the values distinct.
    pub join_multi_value_headers: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            binary_content_types: vec![
                "image/".to_string(),
                "application/pdf".to_string(),
                "application/binary".to_string(),
            ],
            join_multi_value_headers: false,
        }
    }
}

impl AdapterConfig {
    /// Set the base path. `"api"`, `"/api"` and `"/api/"` are equivalent.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self.normalized()
    }

    /// Replace the binary content-type prefix list.
    pub fn with_binary_content_types<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.binary_content_types = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Canonical form: leading slash, no trailing slash, `/` collapses to empty.
    pub fn normalized(mut self) -> Self {
        let trimmed = self.base_path.trim().trim_end_matches('/');
        self.base_path = if trimmed.is_empty() {
            String::new()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        };
        self
    }
}

/// Invocation runtime configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtime API `host:port`. Overrides `AWS_LAMBDA_RUNTIME_API` when set.
    pub api_address: Option<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Socket-mode request timeout in seconds.
    pub request_secs: u64,

    /// Time allowed for in-flight requests to drain on shutdown.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            shutdown_grace_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
