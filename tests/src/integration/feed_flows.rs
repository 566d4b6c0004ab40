//! # Feed Flows
//!
//! Store and stream assembler wired together the way the node runtime
//! wires them: behind `Arc<dyn SocialStore>`. Every scenario runs against
//! both the in-memory and the SQLite backend.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pf_01_post_store::test_utils::{seed_posts, seed_users, timestamp, FaultPoint, FaultyStore};
    use pf_01_post_store::{
        InMemoryPostStore, PostStoreWriter, SocialStore, SqlitePostStore, StoreError,
    };
    use pf_02_feed_stream::{
        FeedStreamApi, StreamAssembler, StreamConfig, StreamError, FEED_PAGE_LIMIT,
    };
    use shared_types::{PostId, UserId};
    use tempfile::TempDir;

    // =========================================================================
    // FIXTURES
    // =========================================================================

    fn backends(dir: &TempDir) -> Vec<(&'static str, Arc<dyn SocialStore>)> {
        let sqlite = SqlitePostStore::open(&dir.path().join("feed.db")).unwrap();
        vec![
            ("memory", Arc::new(InMemoryPostStore::new())),
            ("sqlite", Arc::new(sqlite)),
        ]
    }

    fn assembler(store: &Arc<dyn SocialStore>) -> StreamAssembler<dyn SocialStore> {
        StreamAssembler::new(Arc::clone(store), &StreamConfig::default())
    }

    // =========================================================================
    // ORDERING
    // =========================================================================

    #[tokio::test]
    async fn test_two_author_scenario_on_every_backend() {
        let dir = TempDir::new().unwrap();
        for (name, store) in backends(&dir) {
            let users = seed_users(store.as_ref(), &["a", "b", "c"]).await.unwrap();
            let (a, b, c) = (users[0], users[1], users[2]);
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

            let stream = assembler(&store).user_stream(a).await.unwrap();
            let order: Vec<PostId> = stream.iter().map(|p| p.post).collect();
            assert_eq!(order, vec![c_post, b_late, b_early], "backend {}", name);
        }
    }

    #[tokio::test]
    async fn test_page_limit_on_every_backend() {
        let dir = TempDir::new().unwrap();
        for (name, store) in backends(&dir) {
            let users = seed_users(store.as_ref(), &["reader", "x", "y"]).await.unwrap();
            store.follow(users[0], users[1]).await.unwrap();
            store.follow(users[0], users[2]).await.unwrap();
            let older = seed_posts(store.as_ref(), users[1], "2024-03-01", 20)
                .await
                .unwrap();
            let newer = seed_posts(store.as_ref(), users[2], "2024-03-02", 20)
                .await
                .unwrap();

            let stream = assembler(&store).user_stream(users[0]).await.unwrap();
            assert_eq!(stream.len(), FEED_PAGE_LIMIT, "backend {}", name);
            assert_eq!(stream[0].post, newer[19]);
            // 20 newer posts, then the 10 latest of the older author
            assert_eq!(stream[20].post, older[19]);
            assert_eq!(stream[29].post, older[10]);
        }
    }

    #[tokio::test]
    async fn test_enrichment_matches_across_backends() {
        let dir = TempDir::new().unwrap();
        for (name, store) in backends(&dir) {
            let users = seed_users(store.as_ref(), &["a", "b", "c"]).await.unwrap();
            let (a, b, c) = (users[0], users[1], users[2]);
            store.follow(a, b).await.unwrap();
            let posts = seed_posts(store.as_ref(), b, "2024-01-01", 1).await.unwrap();
            store.like(posts[0], c).await.unwrap();
            store.like(posts[0], a).await.unwrap();
            store.comment(posts[0], c, "nice").await.unwrap();
            store.comment(posts[0], a, "agreed").await.unwrap();

            let stream = assembler(&store).user_stream(a).await.unwrap();
            assert_eq!(stream.len(), 1, "backend {}", name);
            let item = &stream[0];
            assert_eq!(item.likes.iter().copied().collect::<Vec<_>>(), vec![a, c]);
            let bodies: Vec<&str> = item.comments.iter().map(|c| c.body.as_str()).collect();
            assert_eq!(bodies, vec!["nice", "agreed"], "backend {}", name);
            assert_eq!(item.comments[0].author_username, "c");
        }
    }

    // =========================================================================
    // FOLLOW GRAPH
    // =========================================================================

    #[tokio::test]
    async fn test_unfollow_removes_author_from_stream() {
        let dir = TempDir::new().unwrap();
        for (name, store) in backends(&dir) {
            let users = seed_users(store.as_ref(), &["a", "b", "c"]).await.unwrap();
            let (a, b, c) = (users[0], users[1], users[2]);
            store.follow(a, b).await.unwrap();
            store.follow(a, c).await.unwrap();
            seed_posts(store.as_ref(), b, "2024-01-01", 2).await.unwrap();
            seed_posts(store.as_ref(), c, "2024-01-01", 2).await.unwrap();

            let assembler = assembler(&store);
            assert_eq!(assembler.user_stream(a).await.unwrap().len(), 4);

            store.unfollow(a, b).await.unwrap();
            let stream = assembler.user_stream(a).await.unwrap();
            assert_eq!(stream.len(), 2, "backend {}", name);
            assert!(stream.iter().all(|p| p.author == c));

            store.unfollow(a, c).await.unwrap();
            assert!(assembler.user_stream(a).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_stream_for_unknown_user_is_empty() {
        let dir = TempDir::new().unwrap();
        for (name, store) in backends(&dir) {
            let stream = assembler(&store)
                .user_stream(UserId(404))
                .await
                .unwrap();
            assert!(stream.is_empty(), "backend {}", name);
        }
    }

    #[tokio::test]
    async fn test_full_range_ids_match_nothing_on_every_backend() {
        let dir = TempDir::new().unwrap();
        let huge = u64::MAX;
        for (name, store) in backends(&dir) {
            let users = seed_users(store.as_ref(), &["a"]).await.unwrap();
            let posts = seed_posts(store.as_ref(), users[0], "2024-01-01", 1)
                .await
                .unwrap();

            let stream = assembler(&store).user_stream(UserId(huge)).await.unwrap();
            assert!(stream.is_empty(), "backend {}", name);
            assert!(store.likes_for(PostId(huge)).await.unwrap().is_empty());
            assert!(store.comments_for(PostId(huge)).await.unwrap().is_empty());

            let result = store.delete_like(posts[0], UserId(huge)).await;
            assert!(
                matches!(result, Err(StoreError::NotFound(_))),
                "backend {}: {:?}",
                name,
                result
            );
            let result = store.delete_like(PostId(huge), users[0]).await;
            assert!(matches!(result, Err(StoreError::NotFound(_))), "backend {}", name);
        }
    }

    // =========================================================================
    // FAILURE PROPAGATION
    // =========================================================================

    #[tokio::test]
    async fn test_single_enrichment_fault_fails_stream_through_trait_object() {
        let faulty = Arc::new(FaultyStore::new());
        let users = seed_users(faulty.as_ref(), &["a", "b"]).await.unwrap();
        faulty.follow(users[0], users[1]).await.unwrap();
        let posts = seed_posts(faulty.as_ref(), users[1], "2024-01-01", 40)
            .await
            .unwrap();
        // The failing post would not even make the page
        faulty.fail_on(FaultPoint::Likes(posts[0]));

        let store: Arc<dyn SocialStore> = faulty.clone();
        let result = assembler(&store).user_stream(users[0]).await;
        assert!(matches!(result, Err(StreamError::Store(_))));

        faulty.clear_faults();
        assert_eq!(
            assembler(&store).user_stream(users[0]).await.unwrap().len(),
            FEED_PAGE_LIMIT
        );
    }
}
