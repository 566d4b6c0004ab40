//! # Node Configuration
//!
//! Unified configuration for the store, the stream assembler and the
//! gateway. Defaults come from each subsystem; environment variables
//! override them.
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `PF_HTTP_HOST` | `gateway.http.host` |
//! | `PF_HTTP_PORT` | `gateway.http.port` |
//! | `PF_REQUEST_TIMEOUT_MS` | `gateway.http.request_timeout_ms` |
//! | `PF_CORS_ORIGINS` | `gateway.cors.allowed_origins` (comma-separated) |
//! | `PF_ENRICHMENT_CONCURRENCY` | `stream.enrichment_concurrency` |
//! | `PF_STORE_BACKEND` | `store.backend` (`memory` or `sqlite`) |
//! | `PF_SQLITE_PATH` | `store.sqlite_path` |
//!
//! Unparsable values are logged and ignored.

use std::path::PathBuf;
use std::str::FromStr;

use pf_02_feed_stream::StreamConfig;
use pf_03_api_gateway::GatewayConfig;
use tracing::{info, warn};

/// Post Store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    Memory,
    #[default]
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Database file for the SQLite backend.
    pub sqlite_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            sqlite_path: PathBuf::from("photo-feed.db"),
        }
    }
}

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Storage configuration.
    pub store: StoreConfig,
    /// Stream assembler configuration.
    pub stream: StreamConfig,
    /// API Gateway configuration.
    pub gateway: GatewayConfig,
}

impl NodeConfig {
    /// Validate every subsystem's configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.stream.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Start from defaults and apply overrides from `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        override_parsed(&lookup, "PF_HTTP_HOST", &mut config.gateway.http.host);
        override_parsed(&lookup, "PF_HTTP_PORT", &mut config.gateway.http.port);
        override_parsed(
            &lookup,
            "PF_REQUEST_TIMEOUT_MS",
            &mut config.gateway.http.request_timeout_ms,
        );
        override_parsed(
            &lookup,
            "PF_ENRICHMENT_CONCURRENCY",
            &mut config.stream.enrichment_concurrency,
        );
        override_parsed(&lookup, "PF_STORE_BACKEND", &mut config.store.backend);

        if let Some(path) = lookup("PF_SQLITE_PATH") {
            config.store.sqlite_path = PathBuf::from(path);
        }

        if let Some(origins) = lookup("PF_CORS_ORIGINS") {
            config.gateway.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        config
    }
}

fn override_parsed<T, F>(lookup: &F, key: &str, target: &mut T)
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(key) {
        match raw.parse() {
            Ok(value) => *target = value,
            Err(_) => warn!(key, value = %raw, "Ignoring unparsable configuration value"),
        }
    }
}

/// Load configuration from the process environment.
pub fn load_config() -> NodeConfig {
    let config = NodeConfig::from_lookup(|key| std::env::var(key).ok());
    info!(
        backend = ?config.store.backend,
        addr = %config.gateway.http_addr(),
        "Loaded configuration"
    );
    config
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown store backend: {0}")]
    UnknownBackend(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
