//! # Services
//!
//! The orchestration layer. Each service holds an explicit handle to the
//! store; the binary builds the store once and passes it to [`Services::new`].

mod admin;
mod forum;
mod post;
mod thread;
mod user;

use std::sync::Arc;

pub use admin::AdminService;
pub use forum::ForumService;
pub use post::PostService;
pub use thread::ThreadService;
pub use user::UserService;

use crate::error::{OptionalExt, StoreResult};
use crate::models::Thread;
use crate::outcome::Outcome;
use crate::resolver::{resolve_thread, ThreadRef};
use crate::traits::Store;

/// Every service, wired to the same store.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub forums: ForumService,
    pub threads: ThreadService,
    pub posts: PostService,
    pub admin: AdminService,
}

impl Services {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            users: UserService::new(store.clone()),
            forums: ForumService::new(store.clone()),
            threads: ThreadService::new(store.clone()),
            posts: PostService::new(store.clone()),
            admin: AdminService::new(store),
        }
    }
}

/// Resolves a `slug_or_id`, mapping absence to `None`.
async fn find_thread(store: &dyn Store, slug_or_id: &str) -> StoreResult<Option<Thread>> {
    resolve_thread(store, slug_or_id).await.optional()
}

fn missing_thread<T, C>(slug_or_id: &str) -> Outcome<T, C> {
    Outcome::not_found(format!(
        "Can't find thread by {}",
        ThreadRef::parse(slug_or_id)
    ))
}
