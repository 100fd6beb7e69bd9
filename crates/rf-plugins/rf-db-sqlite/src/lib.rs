//! # rf-db-sqlite Implementation
//!
//! This crate implements the data mapping between the SQLite relational model
//! and the `rf-core` domain models. Every `sqlx::Error::RowNotFound` becomes
//! `StoreError::NotFound` and every unique violation `StoreError::Duplicate`;
//! any other failure is passed on as a backend error.

mod forum;
mod post;
mod service;
mod thread;
mod user;
mod vote;

use std::str::FromStr;

use anyhow::Context;
use chrono::{DateTime, Utc};
use rf_core::error::{StoreError, StoreResult};
use rf_core::models::{Forum, Post, Thread, User};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url` and applies the
    /// embedded migrations.
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        if url.contains(":memory:") {
            return Self::in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid database url {url}"))?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open {url}"))?;
        Self::migrate(pool).await
    }

    /// A private in-memory database. The pool holds exactly one connection
    /// for its whole life, since every SQLite memory connection is a
    /// separate database.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("migration failed")?;
        log::info!("database connected and migrated");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn wrap_err(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
        other => StoreError::Backend(other.into()),
    }
}

/// Maps every row with `map`, normalizing errors.
fn collect_rows<T>(rows: Vec<SqliteRow>, map: fn(&SqliteRow) -> sqlx::Result<T>) -> StoreResult<Vec<T>> {
    rows.iter().map(map).collect::<sqlx::Result<_>>().map_err(wrap_err)
}

fn encode_time(time: DateTime<Utc>) -> i64 {
    time.timestamp_micros()
}

fn decode_time(micros: i64) -> sqlx::Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| sqlx::Error::Decode(format!("timestamp out of range: {micros}").into()))
}

const USER_COLUMNS: &str = "nickname, fullname, about, email";
const FORUM_COLUMNS: &str = "slug, title, owner, posts, threads";
const THREAD_COLUMNS: &str = "id, title, author, forum, message, slug, created, votes";
const POST_COLUMNS: &str = "id, parent, author, message, thread, forum, created, is_edited";

fn user_from_row(row: &SqliteRow) -> sqlx::Result<User> {
    Ok(User {
        nickname: row.try_get("nickname")?,
        fullname: row.try_get("fullname")?,
        about: row.try_get("about")?,
        email: row.try_get("email")?,
    })
}

fn forum_from_row(row: &SqliteRow) -> sqlx::Result<Forum> {
    Ok(Forum {
        title: row.try_get("title")?,
        user: row.try_get("owner")?,
        slug: row.try_get("slug")?,
        posts: row.try_get("posts")?,
        threads: row.try_get("threads")?,
    })
}

fn thread_from_row(row: &SqliteRow) -> sqlx::Result<Thread> {
    Ok(Thread {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        forum: row.try_get("forum")?,
        message: row.try_get("message")?,
        slug: row.try_get("slug")?,
        created: decode_time(row.try_get("created")?)?,
        votes: row.try_get("votes")?,
    })
}

fn post_from_row(row: &SqliteRow) -> sqlx::Result<Post> {
    Ok(Post {
        id: row.try_get("id")?,
        parent: row.try_get("parent")?,
        author: row.try_get("author")?,
        message: row.try_get("message")?,
        thread: row.try_get("thread")?,
        forum: row.try_get("forum")?,
        created: decode_time(row.try_get("created")?)?,
        is_edited: row.try_get("is_edited")?,
    })
}
