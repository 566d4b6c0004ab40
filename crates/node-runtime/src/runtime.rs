//! # Node Runtime
//!
//! Opens the configured Post Store and serves the gateway until shutdown.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use pf_01_post_store::{InMemoryPostStore, SocialStore};
use pf_03_api_gateway::FeedGateway;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::{NodeConfig, StoreBackend, StoreConfig};

/// Open the Post Store selected by `config`.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn SocialStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory post store");
            Ok(Arc::new(InMemoryPostStore::new()))
        }
        #[cfg(feature = "sqlite")]
        StoreBackend::Sqlite => {
            let store = pf_01_post_store::SqlitePostStore::open(&config.sqlite_path)
                .with_context(|| {
                    format!("opening SQLite store at {}", config.sqlite_path.display())
                })?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "sqlite"))]
        StoreBackend::Sqlite => {
            anyhow::bail!("SQLite backend requested but the `sqlite` feature is disabled")
        }
    }
}

/// The main node runtime wiring all subsystems.
pub struct NodeRuntime {
    gateway: FeedGateway,
}

impl NodeRuntime {
    /// Validate `config`, open the store and build the gateway.
    pub fn new(config: NodeConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;

        let store = open_store(&config.store)?;
        let gateway = FeedGateway::new(config.gateway, store, &config.stream)
            .context("building API gateway")?;

        Ok(Self { gateway })
    }

    /// Serve on the configured address until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.gateway
            .serve(shutdown)
            .await
            .context("API gateway failed")
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn run_on<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.gateway
            .serve_on(listener, shutdown)
            .await
            .context("API gateway failed")
    }
}
