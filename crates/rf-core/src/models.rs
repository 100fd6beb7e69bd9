//! # Domain Models
//!
//! These structs represent the core entities of Rusty-Forum.
//! Field names follow the JSON shape exchanged with clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered forum member. The nickname is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub nickname: String,
    pub fullname: String,
    pub about: String,
    pub email: String,
}

/// Profile fields supplied when a user registers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub email: String,
}

/// Partial profile update. A blank field leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub email: String,
}

impl UserUpdate {
    /// Applies the non-blank fields on top of `current`.
    pub fn merge_into(&self, current: &User) -> User {
        User {
            nickname: current.nickname.clone(),
            fullname: pick(&self.fullname, &current.fullname),
            about: pick(&self.about, &current.about),
            email: pick(&self.email, &current.email),
        }
    }
}

/// A forum. `posts` and `threads` are maintained by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forum {
    pub title: String,
    /// Owner nickname
    pub user: String,
    pub slug: String,
    pub posts: i64,
    pub threads: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewForum {
    pub title: String,
    pub user: String,
    pub slug: String,
}

/// A discussion thread inside a forum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Slug of the owning forum
    pub forum: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub created: DateTime<Utc>,
    pub votes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewThread {
    pub title: String,
    pub author: String,
    pub message: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl NewThread {
    /// The slug to persist; an empty string means the thread has none.
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref().filter(|s| !s.is_empty())
    }
}

/// Partial thread update. A blank field leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadUpdate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

/// The fundamental unit of conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    /// Id of the parent post, 0 for a root post
    pub parent: i64,
    pub author: String,
    pub message: String,
    pub thread: i64,
    pub forum: String,
    pub created: DateTime<Utc>,
    #[serde(rename = "isEdited")]
    pub is_edited: bool,
}

impl Post {
    pub fn is_root(&self) -> bool {
        self.parent == 0
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub parent: i64,
    pub author: String,
    pub message: String,
}

/// Polarity of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Voice {
    Up,
    Down,
}

impl Voice {
    pub fn value(self) -> i64 {
        match self {
            Voice::Up => 1,
            Voice::Down => -1,
        }
    }
}

impl TryFrom<i64> for Voice {
    type Error = i64;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(Voice::Up),
            -1 => Ok(Voice::Down),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub nickname: String,
    pub thread: i64,
    pub voice: Voice,
}

/// Row counts reported by the administrative status endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub user: i64,
    pub forum: i64,
    pub thread: i64,
    pub post: i64,
}

/// Entities that can be attached to a post details response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Related {
    User,
    Forum,
    Thread,
}

impl Related {
    /// Parses a comma separated list such as `user,thread`. Unknown names are skipped.
    pub fn parse_list(raw: &str) -> Vec<Related> {
        let mut related = Vec::new();
        for name in raw.split(',').map(str::trim) {
            let item = match name {
                "user" => Related::User,
                "forum" => Related::Forum,
                "thread" => Related::Thread,
                _ => continue,
            };
            if !related.contains(&item) {
                related.push(item);
            }
        }
        related
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDetails {
    pub post: Post,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forum: Option<Forum>,
}

fn pick(candidate: &str, current: &str) -> String {
    if candidate.trim().is_empty() {
        current.to_string()
    } else {
        candidate.to_string()
    }
}
