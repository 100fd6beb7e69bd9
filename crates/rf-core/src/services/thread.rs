use std::sync::Arc;

use chrono::Utc;

use super::{find_thread, missing_thread};
use crate::error::{DuplicateExt, OptionalExt};
use crate::models::{NewThread, Thread, ThreadUpdate, Vote, Voice};
use crate::outcome::{Outcome, Reply};
use crate::traits::Store;

#[derive(Clone)]
pub struct ThreadService {
    store: Arc<dyn Store>,
}

impl ThreadService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Opens a thread in the forum `forum_slug`. A taken slug
    /// short-circuits with the thread that holds it.
    pub async fn create_thread(&self, forum_slug: &str, request: NewThread) -> Reply<Thread, Thread> {
        let Some(author) = self.store.get_user(&request.author).await.optional()? else {
            return Ok(Outcome::not_found(format!(
                "Can't find user by nickname: {}",
                request.author
            )));
        };
        let Some(forum) = self.store.get_forum(forum_slug).await.optional()? else {
            return Ok(Outcome::not_found(format!(
                "Can't find thread forum by slug: {forum_slug}"
            )));
        };

        if let Some(slug) = request.slug() {
            if let Some(existing) = self.store.get_thread_by_slug(slug).await.optional()? {
                log::debug!("thread slug {slug} is taken by thread {}", existing.id);
                return Ok(Outcome::Conflict(existing));
            }
        }

        let thread = NewThread {
            author: author.nickname,
            slug: request.slug().map(str::to_string),
            created: Some(request.created.unwrap_or_else(Utc::now)),
            ..request
        };
        let Some(created) = self.store.create_thread(&forum.slug, &thread).await.unless_duplicate()? else {
            // only the slug is unique
            let slug = thread.slug().unwrap_or_default();
            let existing = self.store.get_thread_by_slug(slug).await?;
            log::debug!("thread slug {slug} was taken concurrently by thread {}", existing.id);
            return Ok(Outcome::Conflict(existing));
        };
        log::info!("created thread {} in forum {}", created.id, created.forum);
        Ok(Outcome::Created(created))
    }

    /// Casts `voice` on behalf of `nickname`. Repeating the same voice is a
    /// no-op; flipping it moves the total by two.
    pub async fn vote(&self, slug_or_id: &str, nickname: &str, voice: i64) -> Reply<Thread> {
        let Ok(voice) = Voice::try_from(voice) else {
            return Ok(Outcome::invalid(format!(
                "voice must be 1 or -1, got {voice}"
            )));
        };

        let Some(thread) = find_thread(self.store.as_ref(), slug_or_id).await? else {
            return Ok(missing_thread(slug_or_id));
        };
        let Some(user) = self.store.get_user(nickname).await.optional()? else {
            return Ok(Outcome::not_found(format!(
                "Can't find user by nickname: {nickname}"
            )));
        };

        let vote = Vote {
            nickname: user.nickname,
            thread: thread.id,
            voice,
        };
        let cast = self.store.cast_vote(&vote).await?;
        log::debug!(
            "vote by {} on thread {}: {:?}, total {}",
            vote.nickname,
            vote.thread,
            cast.effect,
            cast.thread.votes
        );
        Ok(Outcome::Ok(cast.thread))
    }

    pub async fn get_details(&self, slug_or_id: &str) -> Reply<Thread> {
        match find_thread(self.store.as_ref(), slug_or_id).await? {
            Some(thread) => Ok(Outcome::Ok(thread)),
            None => Ok(missing_thread(slug_or_id)),
        }
    }

    /// Updates title and message; blank fields keep their stored value.
    pub async fn update_thread(&self, slug_or_id: &str, update: ThreadUpdate) -> Reply<Thread> {
        let Some(thread) = find_thread(self.store.as_ref(), slug_or_id).await? else {
            return Ok(missing_thread(slug_or_id));
        };

        let title = keep_if_blank(&update.title, &thread.title);
        let message = keep_if_blank(&update.message, &thread.message);
        if title == thread.title && message == thread.message {
            return Ok(Outcome::Ok(thread));
        }

        let updated = self.store.update_thread(thread.id, title, message).await?;
        log::info!("updated thread {}", updated.id);
        Ok(Outcome::Ok(updated))
    }
}

fn keep_if_blank<'a>(candidate: &'a str, current: &'a str) -> &'a str {
    if candidate.is_empty() {
        current
    } else {
        candidate
    }
}
