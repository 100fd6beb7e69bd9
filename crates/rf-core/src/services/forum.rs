use std::sync::Arc;

use crate::error::{DuplicateExt, OptionalExt};
use crate::models::{Forum, NewForum, Thread, User};
use crate::outcome::{Outcome, Reply};
use crate::pagination::{ThreadPage, UserPage};
use crate::traits::Store;

#[derive(Clone)]
pub struct ForumService {
    store: Arc<dyn Store>,
}

impl ForumService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates a forum. An existing slug short-circuits with that forum;
    /// an unknown owner is reported before anything is written.
    pub async fn create_forum(&self, request: NewForum) -> Reply<Forum, Forum> {
        if let Some(existing) = self.store.get_forum(&request.slug).await.optional()? {
            log::debug!("forum {} already exists", existing.slug);
            return Ok(Outcome::Conflict(existing));
        }

        let Some(owner) = self.store.get_user(&request.user).await.optional()? else {
            return Ok(Outcome::not_found(format!(
                "Can't find user by nickname: {}",
                request.user
            )));
        };

        let forum = NewForum {
            user: owner.nickname,
            ..request
        };
        if self.store.create_forum(&forum).await.unless_duplicate()?.is_none() {
            let existing = self.store.get_forum(&forum.slug).await?;
            log::debug!("forum {} was created concurrently", existing.slug);
            return Ok(Outcome::Conflict(existing));
        }
        let stored = self.store.get_forum(&forum.slug).await?;
        log::info!("created forum {} owned by {}", stored.slug, stored.user);
        Ok(Outcome::Created(stored))
    }

    pub async fn get_forum(&self, slug: &str) -> Reply<Forum> {
        match self.store.get_forum(slug).await.optional()? {
            Some(forum) => Ok(Outcome::Ok(forum)),
            None => Ok(missing_forum(slug)),
        }
    }

    pub async fn list_threads(&self, slug: &str, page: &ThreadPage) -> Reply<Vec<Thread>> {
        let Some(forum) = self.store.get_forum(slug).await.optional()? else {
            return Ok(missing_forum(slug));
        };
        let threads = self.store.list_forum_threads(&forum.slug, page).await?;
        Ok(Outcome::Ok(threads))
    }

    pub async fn list_users(&self, slug: &str, page: &UserPage) -> Reply<Vec<User>> {
        let Some(forum) = self.store.get_forum(slug).await.optional()? else {
            return Ok(missing_forum(slug));
        };
        let users = self.store.list_forum_users(&forum.slug, page).await?;
        Ok(Outcome::Ok(users))
    }
}

fn missing_forum<T>(slug: &str) -> Outcome<T> {
    Outcome::not_found(format!("Can't find forum with slug: {slug}"))
}
