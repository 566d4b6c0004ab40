//! Middleware stack for the API Gateway.
//!
//! Layer order: Request → CORS → Tracing → Timeout → Handler
//!
//! Authentication is not a layer: it needs the owner id from the path, so
//! handlers call `auth::authorize_owner` after parsing it.

pub mod auth;
pub mod cors;
pub mod tracing;

pub use auth::{authorize_owner, check_authorized, extract_bearer_token, AuthError};
pub use cors::create_cors_layer;
pub use tracing::TracingLayer;
