//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the host.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the service host.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HostConfig {
    /// Application identity.
    pub app: AppConfig,

    /// Listener configuration (bind address, concurrency).
    pub listener: ListenerConfig,

    /// Request timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Lifecycle hook and drain deadlines.
    pub lifecycle: LifecycleConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Built-in `/health` and `/info` endpoints.
    pub meta: MetaConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Application identity reported by `/info` and the lifecycle log lines.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Human-readable title.
    pub title: String,

    /// Version string.
    pub version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Service Host API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Maximum requests in flight at once (backpressure).
    pub max_concurrent_requests: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            max_concurrent_requests: 10_000,
        }
    }
}

/// Timeout configuration for request handling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Deadlines for the lifecycle phases.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Maximum time the startup notification may take, in seconds.
    pub startup_timeout_secs: u64,

    /// Maximum time the shutdown notification may take, in seconds.
    pub shutdown_timeout_secs: u64,

    /// Maximum time to wait for in-flight requests after the termination signal.
    pub drain_timeout_secs: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            startup_timeout_secs: 30,
            shutdown_timeout_secs: 30,
            drain_timeout_secs: 30,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Built-in endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetaConfig {
    /// Serve `/health` and `/info` next to the mounted routers.
    pub enabled: bool,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
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

    /// Log output format.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_uses_defaults() {
        let config: HostConfig = toml::from_str("").unwrap();
        assert_eq!(config.app.title, "Service Host API");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
        assert_eq!(config.lifecycle.drain_timeout_secs, 30);
        assert!(config.meta.enabled);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: HostConfig = toml::from_str(
            r#"
            [app]
            title = "Inventory"

            [lifecycle]
            startup_timeout_secs = 5

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.app.title, "Inventory");
        assert_eq!(config.app.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(config.lifecycle.startup_timeout_secs, 5);
        assert_eq!(config.lifecycle.shutdown_timeout_secs, 30);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }
}
