//! Resolves the `slug_or_id` path segment used by every thread-addressed
//! operation.

use crate::error::StoreResult;
use crate::models::Thread;
use crate::traits::ThreadRepo;

/// How a thread is addressed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadRef<'a> {
    Id(i64),
    Slug(&'a str),
}

impl<'a> ThreadRef<'a> {
    /// Anything that parses as an integer is an id; only a failed parse
    /// makes it a slug.
    pub fn parse(slug_or_id: &'a str) -> Self {
        match slug_or_id.parse::<i64>() {
            Ok(id) => ThreadRef::Id(id),
            Err(_) => ThreadRef::Slug(slug_or_id),
        }
    }
}

impl std::fmt::Display for ThreadRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadRef::Id(id) => write!(f, "id: {id}"),
            ThreadRef::Slug(slug) => write!(f, "slug: {slug}"),
        }
    }
}

/// Looks the thread up by id or by slug.
pub async fn resolve_thread<R>(repo: &R, slug_or_id: &str) -> StoreResult<Thread>
where
    R: ThreadRepo + ?Sized,
{
    match ThreadRef::parse(slug_or_id) {
        ThreadRef::Id(id) => repo.get_thread_by_id(id).await,
        ThreadRef::Slug(slug) => repo.get_thread_by_slug(slug).await,
    }
}
