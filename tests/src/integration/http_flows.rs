//! # HTTP Flows
//!
//! Full request flows through the gateway router: session, stream,
//! profile and like deletion, backed by SQLite files or fault-injecting
//! stores.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use axum::Router;
    use pf_01_post_store::test_utils::{seed_posts, seed_users, timestamp, FaultPoint, FaultyStore};
    use pf_01_post_store::{PostStoreWriter, SocialStore, SqlitePostStore};
    use pf_02_feed_stream::{StreamConfig, FEED_PAGE_LIMIT};
    use pf_03_api_gateway::domain::{ErrorBody, LoginResponse, ProfileResponse, UserPost};
    use pf_03_api_gateway::{build_router, AppState, GatewayConfig};
    use serde_json::Value;
    use shared_types::{PostId, UserId};
    use tempfile::TempDir;
    use tower::ServiceExt;

    // =========================================================================
    // FIXTURES
    // =========================================================================

    fn router_for(store: Arc<dyn SocialStore>) -> Router {
        build_router(
            AppState::new(store, &StreamConfig::default()),
            &GatewayConfig::default(),
        )
    }

    fn sqlite_store(dir: &TempDir) -> Arc<dyn SocialStore> {
        Arc::new(SqlitePostStore::open(&dir.path().join("feed.db")).unwrap())
    }

    fn bearer(user: UserId) -> String {
        format!("Bearer {}", user)
    }

    async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        app.clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn login(app: &Router, username: &str) -> UserId {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/session")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "username": username }).to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: LoginResponse = read_json(response).await;
        body.id
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // =========================================================================
    // STREAM
    // =========================================================================

    #[tokio::test]
    async fn test_login_follow_post_stream_over_sqlite() {
        let dir = TempDir::new().unwrap();
        let store = sqlite_store(&dir);
        let app = router_for(Arc::clone(&store));

        let a = login(&app, "alice").await;
        let b = login(&app, "bob").await;
        let c = login(&app, "carol").await;
        // Logging in again returns the same identifier
        assert_eq!(login(&app, "alice").await, a);

        store.follow(a, b).await.unwrap();
        store.follow(a, c).await.unwrap();
        let b_late = store
            .create_post(b, timestamp("2024-01-02", "10:00"))
            .await
            .unwrap();
        let b_early = store
            .create_post(b, timestamp("2024-01-01", "09:00"))
            .await
            .unwrap();
        let c_post = store
            .create_post(c, timestamp("2024-01-02", "11:00"))
            .await
            .unwrap();
        store.like(c_post, a).await.unwrap();
        store.comment(c_post, b, "great shot").await.unwrap();

        let uri = format!("/users/{}/stream", a);
        let response = send(&app, Method::GET, &uri, Some(&bearer(a))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let stream: Vec<UserPost> = read_json(response).await;
        let order: Vec<PostId> = stream.iter().map(|p| p.photo_id).collect();
        assert_eq!(order, vec![c_post, b_late, b_early]);

        let top = &stream[0];
        assert_eq!(top.username, "carol");
        assert_eq!(top.date, "2024-01-02");
        assert_eq!(top.time, "11:00:00");
        assert_eq!(top.likes, vec![a]);
        assert_eq!(top.comments.len(), 1);
        assert_eq!(top.comments[0].username, "bob");
        assert_eq!(top.comments[0].comment, "great shot");
    }

    #[tokio::test]
    async fn test_stream_wire_format_uses_camel_case() {
        let dir = TempDir::new().unwrap();
        let store = sqlite_store(&dir);
        let app = router_for(Arc::clone(&store));
        let users = seed_users(store.as_ref(), &["a", "b"]).await.unwrap();
        store.follow(users[0], users[1]).await.unwrap();
        seed_posts(store.as_ref(), users[1], "2024-02-02", 1).await.unwrap();

        let uri = format!("/users/{}/stream", users[0]);
        let response = send(&app, Method::GET, &uri, Some(&bearer(users[0]))).await;
        let body: Value = read_json(response).await;
        let item = &body[0];
        for key in ["userId", "username", "photoId", "date", "time", "likes", "comments"] {
            assert!(item.get(key).is_some(), "missing field {}", key);
        }
    }

    #[tokio::test]
    async fn test_stream_page_is_capped() {
        let dir = TempDir::new().unwrap();
        let store = sqlite_store(&dir);
        let app = router_for(Arc::clone(&store));
        let users = seed_users(store.as_ref(), &["reader", "prolific"]).await.unwrap();
        store.follow(users[0], users[1]).await.unwrap();
        let posts = seed_posts(store.as_ref(), users[1], "2024-01-01", 45)
            .await
            .unwrap();

        let uri = format!("/users/{}/stream", users[0]);
        let response = send(&app, Method::GET, &uri, Some(&bearer(users[0]))).await;
        let stream: Vec<UserPost> = read_json(response).await;
        assert_eq!(stream.len(), FEED_PAGE_LIMIT);
        assert_eq!(stream[0].photo_id, posts[44]);
        assert_eq!(stream[FEED_PAGE_LIMIT - 1].photo_id, posts[15]);
    }

    #[tokio::test]
    async fn test_stream_without_follows_is_empty_array() {
        let dir = TempDir::new().unwrap();
        let app = router_for(sqlite_store(&dir));
        let user = login(&app, "loner").await;

        let uri = format!("/users/{}/stream", user);
        let response = send(&app, Method::GET, &uri, Some(&bearer(user))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = read_json(response).await;
        assert_eq!(body, serde_json::json!([]));
    }

    // =========================================================================
    // AUTHORIZATION
    // =========================================================================

    #[tokio::test]
    async fn test_stream_of_other_user_rejected() {
        let dir = TempDir::new().unwrap();
        let app = router_for(sqlite_store(&dir));

        let response = send(&app, Method::GET, "/users/7/stream", Some("Bearer 5")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: ErrorBody = read_json(response).await;
        assert!(!body.error.is_empty());
    }

    #[tokio::test]
    async fn test_missing_token_rejected_on_every_protected_route() {
        let dir = TempDir::new().unwrap();
        let app = router_for(sqlite_store(&dir));

        for (method, uri) in [
            (Method::GET, "/users/1/stream"),
            (Method::GET, "/users/1"),
            (Method::DELETE, "/photos/1/likes/1"),
        ] {
            let response = send(&app, method, uri, None).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    // =========================================================================
    // PROFILE AND LIKES
    // =========================================================================

    #[tokio::test]
    async fn test_profile_reflects_posts_and_follows() {
        let dir = TempDir::new().unwrap();
        let store = sqlite_store(&dir);
        let app = router_for(Arc::clone(&store));
        let users = seed_users(store.as_ref(), &["a", "b"]).await.unwrap();
        store.follow(users[1], users[0]).await.unwrap();
        seed_posts(store.as_ref(), users[0], "2024-01-01", 3).await.unwrap();

        let uri = format!("/users/{}", users[0]);
        let response = send(&app, Method::GET, &uri, Some(&bearer(users[0]))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let profile: ProfileResponse = read_json(response).await;
        assert_eq!(profile.username, "a");
        assert_eq!(profile.number_of_photos, 3);
        assert_eq!(profile.followers, vec!["b".to_string()]);
        assert!(profile.following.is_empty());
    }

    #[tokio::test]
    async fn test_delete_like_then_missing_like() {
        let dir = TempDir::new().unwrap();
        let store = sqlite_store(&dir);
        let app = router_for(Arc::clone(&store));
        let users = seed_users(store.as_ref(), &["a", "b"]).await.unwrap();
        let posts = seed_posts(store.as_ref(), users[1], "2024-01-01", 1).await.unwrap();
        store.like(posts[0], users[0]).await.unwrap();

        let uri = format!("/photos/{}/likes/{}", posts[0], users[0]);
        let token = bearer(users[0]);
        let response = send(&app, Method::DELETE, &uri, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(store.likes_for(posts[0]).await.unwrap().is_empty());

        let response = send(&app, Method::DELETE, &uri, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_unknown_like_not_found() {
        let dir = TempDir::new().unwrap();
        let app = router_for(sqlite_store(&dir));
        let response = send(&app, Method::DELETE, "/photos/9/likes/4", Some("Bearer 4")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_full_range_user_id_over_sqlite() {
        let dir = TempDir::new().unwrap();
        let app = router_for(sqlite_store(&dir));
        let token = format!("Bearer {}", u64::MAX);

        let uri = format!("/users/{}/stream", u64::MAX);
        let response = send(&app, Method::GET, &uri, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = read_json(response).await;
        assert_eq!(body, serde_json::json!([]));

        let uri = format!("/photos/4/likes/{}", u64::MAX);
        let response = send(&app, Method::DELETE, &uri, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let uri = format!("/users/{}", u64::MAX);
        let response = send(&app, Method::GET, &uri, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // =========================================================================
    // FAILURES
    // =========================================================================

    #[tokio::test]
    async fn test_storage_fault_surfaces_as_internal_error() {
        let faulty = Arc::new(FaultyStore::new());
        let users = seed_users(faulty.as_ref(), &["a", "b"]).await.unwrap();
        faulty.follow(users[0], users[1]).await.unwrap();
        let posts = seed_posts(faulty.as_ref(), users[1], "2024-01-01", 5)
            .await
            .unwrap();
        faulty.fail_on(FaultPoint::Comments(posts[2]));
        let app = router_for(faulty.clone());

        let uri = format!("/users/{}/stream", users[0]);
        let response = send(&app, Method::GET, &uri, Some(&bearer(users[0]))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = read_json(response).await;
        assert!(!body.error.contains("injected"));

        faulty.clear_faults();
        let response = send(&app, Method::GET, &uri, Some(&bearer(users[0]))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let stream: Vec<UserPost> = read_json(response).await;
        assert_eq!(stream.len(), 5);
    }
}
