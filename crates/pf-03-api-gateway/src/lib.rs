//! # API Gateway (pf-03)
//!
//! HTTP boundary of the photo feed backend.
//!
//! ## Routes
//!
//! | Method | Path | Auth | Success |
//! |--------|------|------|---------|
//! | POST | `/session` | none | 200 `{"id": n}` |
//! | GET | `/users/{userID}/stream` | token == userID | 200 stream array |
//! | GET | `/users/{userID}` | token == userID | 200 profile |
//! | DELETE | `/photos/{photoID}/likes/{userID}` | token == userID | 204 |
//! | GET | `/health` | none | 200 |
//!
//! ## Error Mapping
//!
//! | Failure | Status |
//! |---------|--------|
//! | malformed path id or body | 400 |
//! | missing, malformed or mismatched token | 401 |
//! | unknown resource, missing like | 404 |
//! | storage or enrichment failure, unparsable token payload | 500 |
//!
//! ## Middleware Stack
//!
//! ```text
//! Request → CORS → Tracing → Timeout → Handler
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod middleware;
pub mod routes;
pub mod service;

pub use domain::{ApiError, ConfigError, CorsConfig, GatewayConfig, GatewayError, HttpConfig};
pub use middleware::{check_authorized, extract_bearer_token, AuthError};
pub use service::{build_router, AppState, FeedGateway};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
