//! API Gateway error types.
//!
//! `ApiError` is the only place where failures become HTTP status codes.
//! Client-visible bodies are generic; internal detail is logged server-side.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pf_01_post_store::StoreError;
use pf_02_feed_stream::StreamError;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::domain::config::ConfigError;
use crate::middleware::auth::AuthError;

/// Request-level error returned by every handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Absent, malformed or mismatched token
    #[error("unauthorized")]
    Unauthorized,

    /// Malformed path parameter or body
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Addressed row does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage or assembly failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(details: impl Into<String>) -> Self {
        Self::BadRequest(details.into())
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::Internal(details.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to send to the client.
    pub fn public_message(&self) -> String {
        match self {
            Self::Unauthorized => "unauthorized".to_string(),
            Self::BadRequest(details) => details.clone(),
            Self::NotFound(_) => "not found".to_string(),
            Self::Internal(_) => "internal server error".to_string(),
        }
    }
}

/// JSON error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(details) => error!(error = %details, "Request failed"),
            Self::NotFound(details) => warn!(error = %details, "Resource not found"),
            _ => {}
        }

        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::NotFound(what),
            StoreError::InvalidInput(details) => Self::BadRequest(details),
            StoreError::Conflict(_) | StoreError::Backend(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<StreamError> for ApiError {
    fn from(err: StreamError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized => Self::Unauthorized,
            // Tokens are minted by the server, so an unparsable one is our fault
            AuthError::MalformedToken(_) => Self::Internal(err.to_string()),
        }
    }
}

/// Gateway-level errors (startup and serving, not per request)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(#[source] std::io::Error),

    /// Server stopped with an I/O error
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl From<ConfigError> for GatewayError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
