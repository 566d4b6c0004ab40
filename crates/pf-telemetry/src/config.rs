//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log filter directive (trace, debug, info, warn, error, or a full
    /// `EnvFilter` directive such as `info,pf_02_feed_stream=debug`)
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output
    pub json_logs: bool,

    /// Include file and line in each event
    pub with_location: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "photo-feed".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_location: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OTEL_SERVICE_NAME`: Service name (default: photo-feed)
    /// - `PF_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `PF_JSON_LOGS`: Enable JSON logs (default: false outside containers)
    /// - `PF_LOG_LOCATION`: Include file/line (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();
        let flag = |key: &str| {
            lookup(key).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        };

        Self {
            service_name: lookup("OTEL_SERVICE_NAME").unwrap_or_else(|| "photo-feed".to_string()),
            log_level: lookup("PF_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),
            json_logs: flag("PF_JSON_LOGS").unwrap_or(is_container),
            with_location: flag("PF_LOG_LOCATION").unwrap_or(false),
        }
    }
}
