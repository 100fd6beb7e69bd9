use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;

use super::{find_thread, missing_thread};
use crate::error::OptionalExt;
use crate::models::{NewPost, Post, PostDetails, Related};
use crate::outcome::{Message, Outcome, Reply};
use crate::pagination::PostPage;
use crate::retriever;
use crate::traits::Store;

#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn Store>,
}

impl PostService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Adds a batch of posts to a thread. Every parent must live in the same
    /// thread and every author must exist; otherwise nothing is written.
    pub async fn create_posts(&self, slug_or_id: &str, posts: Vec<NewPost>) -> Reply<Vec<Post>> {
        let Some(thread) = find_thread(self.store.as_ref(), slug_or_id).await? else {
            return Ok(missing_thread(slug_or_id));
        };
        if posts.is_empty() {
            return Ok(Outcome::Created(Vec::new()));
        }

        let parents: BTreeSet<i64> = posts
            .iter()
            .map(|post| post.parent)
            .filter(|parent| *parent != 0)
            .collect();
        for parent in parents {
            let same_thread = self
                .store
                .get_post(parent)
                .await
                .optional()?
                .is_some_and(|post| post.thread == thread.id);
            if !same_thread {
                log::debug!("parent {parent} is not part of thread {}", thread.id);
                return Ok(Outcome::Conflict(Message::new(
                    "Parent post was created in another thread",
                )));
            }
        }

        let authors: BTreeSet<&str> = posts.iter().map(|post| post.author.as_str()).collect();
        for author in authors {
            if self.store.get_user(author).await.optional()?.is_none() {
                return Ok(Outcome::not_found(format!(
                    "Can't find post author by nickname: {author}"
                )));
            }
        }

        let created = self.store.create_posts(&thread, &posts, Utc::now()).await?;
        log::info!("created {} posts in thread {}", created.len(), thread.id);
        Ok(Outcome::Created(created))
    }

    /// Lists the posts of a thread; see [`retriever::list_posts`].
    pub async fn list_posts(&self, slug_or_id: &str, page: &PostPage) -> Reply<Vec<Post>> {
        let Some(thread) = find_thread(self.store.as_ref(), slug_or_id).await? else {
            return Ok(missing_thread(slug_or_id));
        };
        let posts = retriever::list_posts(self.store.as_ref(), thread.id, page).await?;
        Ok(Outcome::Ok(posts))
    }

    /// Fetches a post together with the requested related entities.
    pub async fn get_details(&self, id: i64, related: &[Related]) -> Reply<PostDetails> {
        let Some(post) = self.store.get_post(id).await.optional()? else {
            return Ok(missing_post(id));
        };

        let mut details = PostDetails {
            post,
            author: None,
            thread: None,
            forum: None,
        };
        for item in related {
            match item {
                Related::User => {
                    details.author = Some(self.store.get_user(&details.post.author).await?);
                }
                Related::Thread => {
                    details.thread = Some(self.store.get_thread_by_id(details.post.thread).await?);
                }
                Related::Forum => {
                    details.forum = Some(self.store.get_forum(&details.post.forum).await?);
                }
            }
        }
        Ok(Outcome::Ok(details))
    }

    /// Replaces the message of a post. A blank or identical message leaves
    /// the post, including its edited flag, untouched.
    pub async fn update_post(&self, id: i64, message: &str) -> Reply<Post> {
        let Some(post) = self.store.get_post(id).await.optional()? else {
            return Ok(missing_post(id));
        };
        if message.is_empty() || message == post.message {
            return Ok(Outcome::Ok(post));
        }

        let updated = self.store.update_post_message(id, message).await?;
        log::info!("edited post {id}");
        Ok(Outcome::Ok(updated))
    }
}

fn missing_post<T>(id: i64) -> Outcome<T> {
    Outcome::not_found(format!("Can't find post by id: {id}"))
}
