//! API Gateway service - HTTP server for the photo feed.

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::middleware::{create_cors_layer, TracingLayer};
use crate::routes;
use axum::{
    routing::{delete, get, post},
    Router,
};
use pf_01_post_store::SocialStore;
use pf_02_feed_stream::{FeedStreamApi, StreamAssembler, StreamConfig};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SocialStore>,
    pub stream: Arc<dyn FeedStreamApi>,
}

impl AppState {
    /// Wire a stream assembler on top of `store`.
    pub fn new(store: Arc<dyn SocialStore>, stream_config: &StreamConfig) -> Self {
        let stream: Arc<dyn FeedStreamApi> =
            Arc::new(StreamAssembler::new(Arc::clone(&store), stream_config));
        Self { store, stream }
    }
}

/// Build the HTTP router with its middleware stack.
pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(create_cors_layer(&config.cors))
        .layer(TracingLayer::new())
        .layer(TimeoutLayer::new(config.request_timeout()));

    Router::new()
        .route("/session", post(routes::login))
        .route("/users/:user_id", get(routes::get_user_profile))
        .route("/users/:user_id/stream", get(routes::get_user_stream))
        .route(
            "/photos/:photo_id/likes/:user_id",
            delete(routes::delete_like),
        )
        .route("/health", get(routes::health_check))
        .layer(middleware)
        .with_state(state)
}

/// API Gateway service
pub struct FeedGateway {
    config: GatewayConfig,
    state: AppState,
}

impl FeedGateway {
    /// Create a new gateway over `store`
    pub fn new(
        config: GatewayConfig,
        store: Arc<dyn SocialStore>,
        stream_config: &StreamConfig,
    ) -> Result<Self, GatewayError> {
        config.validate()?;
        stream_config.validate().map_err(GatewayError::Config)?;

        Ok(Self {
            state: AppState::new(store, stream_config),
            config,
        })
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr).await.map_err(GatewayError::Bind)?;
        self.serve_on(listener, shutdown).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        if let Ok(addr) = listener.local_addr() {
            info!(addr = %addr, "Starting HTTP server");
        }

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(GatewayError::Serve)?;

        info!("HTTP server stopped");
        Ok(())
    }
}
