//! Bearer-token authentication.
//!
//! A token has the shape `"<scheme> <digits>"`; the digits are the caller's
//! user id. Callers may act only on their own resources, so authorization
//! is a plain identity comparison.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use shared_types::{parse_identity, UserId};
use tracing::debug;

use crate::domain::ApiError;

/// Token extraction failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Header absent, wrong shape or empty payload
    #[error("missing or malformed authorization header")]
    Unauthorized,

    /// Payload present but not an unsigned 64-bit integer
    #[error("token payload is not a user id: {0}")]
    MalformedToken(String),
}

/// Extract the caller's identity from an `Authorization` header value.
pub fn extract_bearer_token(header: Option<&str>) -> Result<UserId, AuthError> {
    let header = header.ok_or(AuthError::Unauthorized)?;

    let fields: Vec<&str> = header.split(' ').collect();
    let [_scheme, payload] = fields.as_slice() else {
        return Err(AuthError::Unauthorized);
    };
    if payload.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    parse_identity(payload)
        .map(UserId)
        .map_err(|_| AuthError::MalformedToken((*payload).to_string()))
}

/// True iff the requester is the resource owner.
pub fn check_authorized(requester: UserId, owner: UserId) -> bool {
    requester == owner
}

/// Authenticate the request and require it to act on `owner`.
pub fn authorize_owner(headers: &HeaderMap, owner: UserId) -> Result<UserId, ApiError> {
    let header = match headers.get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| ApiError::Unauthorized)?),
        None => None,
    };
    let requester = extract_bearer_token(header)?;

    if !check_authorized(requester, owner) {
        debug!(requester = %requester, owner = %owner, "Token does not match resource owner");
        return Err(ApiError::Unauthorized);
    }
    Ok(requester)
}
