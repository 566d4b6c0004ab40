//! Test doubles and fixtures for the Post Store.
//!
//! `FaultyStore` wraps the in-memory store and fails selected reads, which
//! lets downstream crates exercise their failure paths.

use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Comment, CommentId, PostId, PostTimestamp, UserId};

use crate::adapters::InMemoryPostStore;
use crate::domain::{FollowedPostRow, StoreError, StoreResult, UserProfile};
use crate::ports::inbound::{AccountStore, PostStore, PostStoreWriter};

/// Which read to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    FollowedPosts,
    Likes(PostId),
    Comments(PostId),
}

/// In-memory store with injectable read failures.
#[derive(Debug, Default)]
pub struct FaultyStore {
    inner: InMemoryPostStore,
    faults: RwLock<HashSet<FaultPoint>>,
    enrichment_reads: AtomicUsize,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the given read fail with a backend error from now on.
    pub fn fail_on(&self, point: FaultPoint) {
        self.faults.write().insert(point);
    }

    pub fn clear_faults(&self) {
        self.faults.write().clear();
    }

    /// Number of `likes_for` + `comments_for` calls served so far.
    pub fn enrichment_reads(&self) -> usize {
        self.enrichment_reads.load(Ordering::SeqCst)
    }

    fn check(&self, point: FaultPoint) -> StoreResult<()> {
        if self.faults.read().contains(&point) {
            return Err(StoreError::backend(format!("injected fault at {:?}", point)));
        }
        Ok(())
    }
}

#[async_trait]
impl PostStore for FaultyStore {
    async fn followed_posts(&self, user: UserId) -> StoreResult<Vec<FollowedPostRow>> {
        self.check(FaultPoint::FollowedPosts)?;
        self.inner.followed_posts(user).await
    }

    async fn likes_for(&self, post: PostId) -> StoreResult<BTreeSet<UserId>> {
        self.enrichment_reads.fetch_add(1, Ordering::SeqCst);
        self.check(FaultPoint::Likes(post))?;
        self.inner.likes_for(post).await
    }

    async fn comments_for(&self, post: PostId) -> StoreResult<Vec<Comment>> {
        self.enrichment_reads.fetch_add(1, Ordering::SeqCst);
        self.check(FaultPoint::Comments(post))?;
        self.inner.comments_for(post).await
    }
}

#[async_trait]
impl AccountStore for FaultyStore {
    async fn find_user_id(&self, username: &str) -> StoreResult<Option<UserId>> {
        self.inner.find_user_id(username).await
    }

    async fn create_user(&self, username: &str) -> StoreResult<UserId> {
        self.inner.create_user(username).await
    }

    async fn user_profile(&self, user: UserId) -> StoreResult<UserProfile> {
        self.inner.user_profile(user).await
    }
}

#[async_trait]
impl PostStoreWriter for FaultyStore {
    async fn follow(&self, follower: UserId, followed: UserId) -> StoreResult<()> {
        self.inner.follow(follower, followed).await
    }

    async fn unfollow(&self, follower: UserId, followed: UserId) -> StoreResult<()> {
        self.inner.unfollow(follower, followed).await
    }

    async fn ban(&self, user: UserId, banned: UserId) -> StoreResult<()> {
        self.inner.ban(user, banned).await
    }

    async fn create_post(&self, owner: UserId, created: PostTimestamp) -> StoreResult<PostId> {
        self.inner.create_post(owner, created).await
    }

    async fn like(&self, post: PostId, user: UserId) -> StoreResult<()> {
        self.inner.like(post, user).await
    }

    async fn delete_like(&self, post: PostId, user: UserId) -> StoreResult<()> {
        self.inner.delete_like(post, user).await
    }

    async fn comment(&self, post: PostId, user: UserId, body: &str) -> StoreResult<CommentId> {
        self.inner.comment(post, user, body).await
    }

    async fn next_post_id(&self) -> StoreResult<PostId> {
        self.inner.next_post_id().await
    }
}

/// Build a timestamp from literals. Panics on malformed input.
pub fn timestamp(date: &str, time: &str) -> PostTimestamp {
    PostTimestamp::parse(date, time).expect("valid test timestamp")
}

/// Log in every name and return their ids in order.
pub async fn seed_users<S>(store: &S, names: &[&str]) -> StoreResult<Vec<UserId>>
where
    S: AccountStore + ?Sized,
{
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        ids.push(store.login(name).await?);
    }
    Ok(ids)
}

/// Create `count` posts by `owner` on `date`, one minute apart from 00:00.
pub async fn seed_posts<S>(
    store: &S,
    owner: UserId,
    date: &str,
    count: u32,
) -> StoreResult<Vec<PostId>>
where
    S: PostStoreWriter + ?Sized,
{
    let mut ids = Vec::with_capacity(count as usize);
    for i in 0..count {
        let time = format!("{:02}:{:02}", i / 60, i % 60);
        ids.push(store.create_post(owner, timestamp(date, &time)).await?);
    }
    Ok(ids)
}
