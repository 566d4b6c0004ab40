//! HTTP handlers.
//!
//! Every owner-scoped handler parses its path ids first (400), then checks
//! the token (401), and only then touches storage.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use shared_types::{parse_identity, PostId, UserId};
use tracing::info;

use crate::domain::{
    ApiError, HealthResponse, LoginRequest, LoginResponse, ProfileResponse, UserPost,
};
use crate::middleware::authorize_owner;
use crate::service::AppState;

fn parse_path_id(raw: &str, what: &str) -> Result<u64, ApiError> {
    parse_identity(raw).map_err(|_| ApiError::bad_request(format!("invalid {}", what)))
}

/// `POST /session`
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let id = state.store.login(&request.username).await?;
    info!(user_id = %id, "Session started");
    Ok(Json(LoginResponse { id }))
}

/// `GET /users/{userID}/stream`
pub async fn get_user_stream(
    State(state): State<AppState>,
    Path(raw_user): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserPost>>, ApiError> {
    let user = UserId(parse_path_id(&raw_user, "user id")?);
    authorize_owner(&headers, user)?;

    let stream = state.stream.user_stream(user).await?;
    Ok(Json(stream.into_iter().map(UserPost::from).collect()))
}

/// `GET /users/{userID}`
pub async fn get_user_profile(
    State(state): State<AppState>,
    Path(raw_user): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = UserId(parse_path_id(&raw_user, "user id")?);
    authorize_owner(&headers, user)?;

    let profile = state.store.user_profile(user).await?;
    Ok(Json(profile.into()))
}

/// `DELETE /photos/{photoID}/likes/{userID}`
pub async fn delete_like(
    State(state): State<AppState>,
    Path((raw_post, raw_user)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let post = PostId(parse_path_id(&raw_post, "photo id")?);
    let user = UserId(parse_path_id(&raw_user, "user id")?);
    authorize_owner(&headers, user)?;

    state.store.delete_like(post, user).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /health`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
