//! SQLite Post Store.
//!
//! Writes go through one connection guarded by a mutex. For file-backed
//! databases every read opens its own read-only connection, so feed reads
//! never queue behind each other or behind a writer (WAL mode). All SQL runs
//! on the blocking pool.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use shared_types::{Comment, CommentId, PostId, PostTimestamp, UserId};
use tracing::{debug, info};

use crate::domain::{FollowedPostRow, StoreError, StoreResult, UserProfile};
use crate::ports::inbound::{
    ensure_distinct, follow_edge, normalize_username, AccountStore, PostStore, PostStoreWriter,
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    user_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS posts (
    post_id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(user_id),
    date    TEXT NOT NULL,
    time    TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS likes (
    post_id INTEGER NOT NULL REFERENCES posts(post_id),
    user_id INTEGER NOT NULL REFERENCES users(user_id),
    PRIMARY KEY (post_id, user_id)
);
CREATE TABLE IF NOT EXISTS comments (
    comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id    INTEGER NOT NULL REFERENCES posts(post_id),
    user_id    INTEGER NOT NULL REFERENCES users(user_id),
    body       TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS following (
    follower_id INTEGER NOT NULL REFERENCES users(user_id),
    followed_id INTEGER NOT NULL REFERENCES users(user_id),
    PRIMARY KEY (follower_id, followed_id)
);
CREATE TABLE IF NOT EXISTS banned (
    user_id   INTEGER NOT NULL REFERENCES users(user_id),
    banned_id INTEGER NOT NULL REFERENCES users(user_id),
    PRIMARY KEY (user_id, banned_id)
);
CREATE INDEX IF NOT EXISTS posts_by_owner ON posts(user_id);
CREATE INDEX IF NOT EXISTS comments_by_post ON comments(post_id);
";

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Conflict(err.to_string())
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

/// SQLite integers are signed, so ids above `i64::MAX` never match a row.
fn stored_id(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

/// Id bound for a statement that must hit an existing row.
fn to_sql(id: u64, what: &str) -> StoreResult<i64> {
    stored_id(id).ok_or_else(|| StoreError::not_found(format!("{} {}", what, id)))
}

fn from_sql(raw: i64) -> StoreResult<u64> {
    u64::try_from(raw).map_err(|_| StoreError::backend(format!("negative id {} in storage", raw)))
}

fn parse_created(date: &str, time: &str) -> StoreResult<PostTimestamp> {
    PostTimestamp::parse(date, time)
        .ok_or_else(|| StoreError::backend(format!("corrupt timestamp {} {}", date, time)))
}

fn user_exists(conn: &Connection, user: i64) -> StoreResult<()> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT user_id FROM users WHERE user_id = ?1",
            params![user],
            |row| row.get(0),
        )
        .optional()?;
    found
        .map(|_| ())
        .ok_or_else(|| StoreError::not_found(format!("user {}", user)))
}

fn post_exists(conn: &Connection, post: i64) -> StoreResult<()> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT post_id FROM posts WHERE post_id = ?1",
            params![post],
            |row| row.get(0),
        )
        .optional()?;
    found
        .map(|_| ())
        .ok_or_else(|| StoreError::not_found(format!("post {}", post)))
}

fn usernames(conn: &Connection, sql: &str, user: i64) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let names = stmt
        .query_map(params![user], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

/// Persistent store backed by rusqlite (bundled SQLite).
pub struct SqlitePostStore {
    writer: Arc<Mutex<Connection>>,
    /// `None` for in-memory databases, which reads share with the writer.
    path: Option<PathBuf>,
}

impl SqlitePostStore {
    /// Open or create a database at `path` and apply the schema.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;
        info!(path = %path.display(), "Opened SQLite post store");

        Ok(Self {
            writer: Arc::new(Mutex::new(conn)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Create an in-memory database (useful for tests).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            writer: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    async fn read<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let writer = Arc::clone(&self.writer);
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || match path {
            Some(path) => {
                let conn = Connection::open_with_flags(
                    &path,
                    OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
                )?;
                f(&conn)
            }
            None => f(&writer.lock()),
        })
        .await
        .map_err(|e| StoreError::backend(format!("blocking read failed: {}", e)))?
    }

    async fn write<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
    {
        let writer = Arc::clone(&self.writer);
        tokio::task::spawn_blocking(move || f(&mut writer.lock()))
            .await
            .map_err(|e| StoreError::backend(format!("blocking write failed: {}", e)))?
    }
}

#[async_trait]
impl PostStore for SqlitePostStore {
    async fn followed_posts(&self, user: UserId) -> StoreResult<Vec<FollowedPostRow>> {
        let Some(follower) = stored_id(user.get()) else {
            return Ok(Vec::new());
        };
        let rows: Vec<FollowedPostRow> = self
            .read(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT p.post_id, p.user_id, u.username, p.date, p.time
                     FROM following f
                     JOIN posts p ON p.user_id = f.followed_id
                     JOIN users u ON u.user_id = p.user_id
                     WHERE f.follower_id = ?1",
                )?;
                let raw = stmt
                    .query_map(params![follower], |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, i64>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, String>(4)?,
                        ))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                raw.into_iter()
                    .map(|(post, author, author_username, date, time)| -> StoreResult<_> {
                        Ok(FollowedPostRow {
                            post: PostId(from_sql(post)?),
                            author: UserId(from_sql(author)?),
                            author_username,
                            created: parse_created(&date, &time)?,
                        })
                    })
                    .collect()
            })
            .await?;

        debug!(user_id = %user, posts = rows.len(), "Resolved followed posts");
        Ok(rows)
    }

    async fn likes_for(&self, post: PostId) -> StoreResult<BTreeSet<UserId>> {
        let Some(post) = stored_id(post.get()) else {
            return Ok(BTreeSet::new());
        };
        self.read(move |conn| {
            let mut stmt = conn.prepare("SELECT user_id FROM likes WHERE post_id = ?1")?;
            let raw = stmt
                .query_map(params![post], |row| row.get::<_, i64>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            raw.into_iter().map(|id| from_sql(id).map(UserId)).collect()
        })
        .await
    }

    async fn comments_for(&self, post: PostId) -> StoreResult<Vec<Comment>> {
        let Some(post_sql) = stored_id(post.get()) else {
            return Ok(Vec::new());
        };
        self.read(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT c.comment_id, c.user_id, u.username, c.body
                 FROM comments c
                 JOIN users u ON u.user_id = c.user_id
                 WHERE c.post_id = ?1
                 ORDER BY c.comment_id",
            )?;
            let raw = stmt
                .query_map(params![post_sql], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            raw.into_iter()
                .map(|(id, author, author_username, body)| -> StoreResult<_> {
                    Ok(Comment {
                        id: CommentId(from_sql(id)?),
                        post,
                        author: UserId(from_sql(author)?),
                        author_username,
                        body,
                    })
                })
                .collect()
        })
        .await
    }
}

#[async_trait]
impl AccountStore for SqlitePostStore {
    async fn find_user_id(&self, username: &str) -> StoreResult<Option<UserId>> {
        let username = username.to_string();
        self.read(move |conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT user_id FROM users WHERE username = ?1",
                    params![username],
                    |row| row.get(0),
                )
                .optional()?;
            found.map(|id| from_sql(id).map(UserId)).transpose()
        })
        .await
    }

    async fn create_user(&self, username: &str) -> StoreResult<UserId> {
        let username = normalize_username(username)?.to_string();
        self.write(move |conn| {
            conn.execute("INSERT INTO users (username) VALUES (?1)", params![username])?;
            Ok(UserId(from_sql(conn.last_insert_rowid())?))
        })
        .await
    }

    async fn user_profile(&self, user: UserId) -> StoreResult<UserProfile> {
        let id = to_sql(user.get(), "user")?;
        self.read(move |conn| {
            let username: String = conn
                .query_row(
                    "SELECT username FROM users WHERE user_id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .optional()?
                .ok_or_else(|| StoreError::not_found(format!("user {}", user)))?;

            let mut stmt = conn.prepare(
                "SELECT post_id FROM posts WHERE user_id = ?1
                 ORDER BY date DESC, time DESC, post_id DESC",
            )?;
            let posts = stmt
                .query_map(params![id], |row| row.get::<_, i64>(0))?
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .map(|p| from_sql(p).map(PostId))
                .collect::<StoreResult<Vec<_>>>()?;

            Ok(UserProfile {
                id: user,
                username,
                posts,
                followers: usernames(
                    conn,
                    "SELECT u.username FROM following f JOIN users u ON u.user_id = f.follower_id
                     WHERE f.followed_id = ?1 ORDER BY u.user_id",
                    id,
                )?,
                following: usernames(
                    conn,
                    "SELECT u.username FROM following f JOIN users u ON u.user_id = f.followed_id
                     WHERE f.follower_id = ?1 ORDER BY u.user_id",
                    id,
                )?,
                banned: usernames(
                    conn,
                    "SELECT u.username FROM banned b JOIN users u ON u.user_id = b.banned_id
                     WHERE b.user_id = ?1 ORDER BY u.user_id",
                    id,
                )?,
            })
        })
        .await
    }
}

#[async_trait]
impl PostStoreWriter for SqlitePostStore {
    async fn follow(&self, follower: UserId, followed: UserId) -> StoreResult<()> {
        let edge = follow_edge(follower, followed)?;
        let a = to_sql(edge.follower.get(), "user")?;
        let b = to_sql(edge.followed.get(), "user")?;
        self.write(move |conn| {
            user_exists(conn, a)?;
            user_exists(conn, b)?;
            conn.execute(
                "INSERT INTO following (follower_id, followed_id) VALUES (?1, ?2)",
                params![a, b],
            )?;
            Ok(())
        })
        .await
    }

    async fn unfollow(&self, follower: UserId, followed: UserId) -> StoreResult<()> {
        let edge = format!("follow edge {} -> {}", follower, followed);
        let (a, b) = (to_sql(follower.get(), &edge)?, to_sql(followed.get(), &edge)?);
        self.write(move |conn| {
            let affected = conn.execute(
                "DELETE FROM following WHERE follower_id = ?1 AND followed_id = ?2",
                params![a, b],
            )?;
            if affected == 0 {
                return Err(StoreError::not_found(edge));
            }
            Ok(())
        })
        .await
    }

    async fn ban(&self, user: UserId, banned: UserId) -> StoreResult<()> {
        ensure_distinct(user, banned, "ban")?;
        let (a, b) = (to_sql(user.get(), "user")?, to_sql(banned.get(), "user")?);
        self.write(move |conn| {
            user_exists(conn, a)?;
            user_exists(conn, b)?;
            conn.execute(
                "INSERT INTO banned (user_id, banned_id) VALUES (?1, ?2)",
                params![a, b],
            )?;
            Ok(())
        })
        .await
    }

    async fn create_post(&self, owner: UserId, created: PostTimestamp) -> StoreResult<PostId> {
        let owner_sql = to_sql(owner.get(), "user")?;
        let (date, time) = (created.date_string(), created.time_string());
        let id = self
            .write(move |conn| {
                let tx = conn.transaction()?;
                user_exists(&tx, owner_sql)?;
                let next: i64 = tx.query_row(
                    "SELECT COALESCE(MAX(post_id), 0) + 1 FROM posts",
                    [],
                    |row| row.get(0),
                )?;
                tx.execute(
                    "INSERT INTO posts (post_id, user_id, date, time) VALUES (?1, ?2, ?3, ?4)",
                    params![next, owner_sql, date, time],
                )?;
                tx.commit()?;
                Ok(PostId(from_sql(next)?))
            })
            .await?;

        debug!(post_id = %id, user_id = %owner, "Created post");
        Ok(id)
    }

    async fn like(&self, post: PostId, user: UserId) -> StoreResult<()> {
        let (p, u) = (to_sql(post.get(), "post")?, to_sql(user.get(), "user")?);
        self.write(move |conn| {
            post_exists(conn, p)?;
            user_exists(conn, u)?;
            conn.execute(
                "INSERT INTO likes (post_id, user_id) VALUES (?1, ?2)",
                params![p, u],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete_like(&self, post: PostId, user: UserId) -> StoreResult<()> {
        let like = format!("like (post {}, user {})", post, user);
        let (p, u) = (to_sql(post.get(), &like)?, to_sql(user.get(), &like)?);
        self.write(move |conn| {
            let affected = conn.execute(
                "DELETE FROM likes WHERE post_id = ?1 AND user_id = ?2",
                params![p, u],
            )?;
            if affected == 0 {
                return Err(StoreError::not_found(like));
            }
            Ok(())
        })
        .await
    }

    async fn comment(&self, post: PostId, user: UserId, body: &str) -> StoreResult<CommentId> {
        let body = body.trim().to_string();
        if body.is_empty() {
            return Err(StoreError::invalid("comment body is empty"));
        }
        let (p, u) = (to_sql(post.get(), "post")?, to_sql(user.get(), "user")?);
        self.write(move |conn| {
            post_exists(conn, p)?;
            user_exists(conn, u)?;
            conn.execute(
                "INSERT INTO comments (post_id, user_id, body) VALUES (?1, ?2, ?3)",
                params![p, u, body],
            )?;
            Ok(CommentId(from_sql(conn.last_insert_rowid())?))
        })
        .await
    }

    async fn next_post_id(&self) -> StoreResult<PostId> {
        self.read(|conn| {
            let next: i64 = conn.query_row(
                "SELECT COALESCE(MAX(post_id), 0) + 1 FROM posts",
                [],
                |row| row.get(0),
            )?;
            Ok(PostId(from_sql(next)?))
        })
        .await
    }
}
