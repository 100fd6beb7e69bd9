//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be used by the binary.
//! Every lookup that matches no row reports [`StoreError::NotFound`];
//! everything else is a backend failure.
//!
//! [`StoreError::NotFound`]: crate::error::StoreError::NotFound

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreResult;
use crate::models::{
    Forum, NewForum, NewPost, NewThread, Post, ServiceStatus, Thread, User, Vote,
};
use crate::pagination::{RootCursor, ThreadPage, UserPage};
use crate::votes::CastVote;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create_user(&self, user: &User) -> StoreResult<()>;
    async fn get_user(&self, nickname: &str) -> StoreResult<User>;
    async fn get_user_by_email(&self, email: &str) -> StoreResult<User>;
    /// Users holding either the nickname or the email.
    async fn find_conflicting_users(&self, nickname: &str, email: &str) -> StoreResult<Vec<User>>;
    /// Overwrites the profile fields of `user.nickname`.
    async fn update_user(&self, user: &User) -> StoreResult<User>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ForumRepo: Send + Sync {
    async fn create_forum(&self, forum: &NewForum) -> StoreResult<()>;
    async fn get_forum(&self, slug: &str) -> StoreResult<Forum>;
    async fn list_forum_threads(&self, slug: &str, page: &ThreadPage) -> StoreResult<Vec<Thread>>;
    /// Users that created a thread or a post in the forum.
    async fn list_forum_users(&self, slug: &str, page: &UserPage) -> StoreResult<Vec<User>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ThreadRepo: Send + Sync {
    async fn create_thread(&self, forum: &str, thread: &NewThread) -> StoreResult<Thread>;
    async fn get_thread_by_id(&self, id: i64) -> StoreResult<Thread>;
    async fn get_thread_by_slug(&self, slug: &str) -> StoreResult<Thread>;
    async fn update_thread(&self, id: i64, title: &str, message: &str) -> StoreResult<Thread>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepo: Send + Sync {
    /// Inserts the batch atomically; every post gets the same `created`.
    async fn create_posts(
        &self,
        thread: &Thread,
        posts: &[NewPost],
        created: DateTime<Utc>,
    ) -> StoreResult<Vec<Post>>;
    async fn get_post(&self, id: i64) -> StoreResult<Post>;
    /// The root post of the tree containing `id`.
    async fn get_root_post(&self, id: i64) -> StoreResult<Post>;
    /// Replaces the message and marks the post as edited.
    async fn update_post_message(&self, id: i64, message: &str) -> StoreResult<Post>;

    /// Posts ordered by (created, id); `since` is an exclusive id bound.
    async fn list_posts_flat(
        &self,
        thread: i64,
        since: Option<i64>,
        desc: bool,
        limit: i64,
    ) -> StoreResult<Vec<Post>>;
    /// Root posts ordered by (created, id), starting after `cursor`.
    async fn list_root_posts(
        &self,
        thread: i64,
        cursor: RootCursor,
        desc: bool,
        limit: i64,
    ) -> StoreResult<Vec<Post>>;
    /// Every post belonging to the trees of `roots`, roots included, unordered.
    async fn list_subtrees(&self, thread: i64, roots: &[i64]) -> StoreResult<Vec<Post>>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait VoteRepo: Send + Sync {
    /// Records the vote and adjusts the thread total as one atomic unit.
    async fn cast_vote(&self, vote: &Vote) -> StoreResult<CastVote>;
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ServiceRepo: Send + Sync {
    async fn status(&self) -> StoreResult<ServiceStatus>;
    /// Deletes every entity of every type.
    async fn clear(&self) -> StoreResult<()>;
}

/// The full persistence contract. One handle is shared by all services.
pub trait Store: UserRepo + ForumRepo + ThreadRepo + PostRepo + VoteRepo + ServiceRepo {}

impl<T> Store for T where T: UserRepo + ForumRepo + ThreadRepo + PostRepo + VoteRepo + ServiceRepo {}
