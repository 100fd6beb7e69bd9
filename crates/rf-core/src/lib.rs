//! rusty-forum/crates/rf-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Rusty-Forum.

pub mod error;
pub mod models;
pub mod outcome;
pub mod pagination;
pub mod resolver;
pub mod retriever;
pub mod services;
pub mod traits;
pub mod votes;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use outcome::*;
pub use pagination::*;
pub use services::Services;
pub use traits::*;
pub use votes::*;

#[cfg(test)]
mod tests {
    use super::models::*;

    #[test]
    fn post_serializes_edited_flag_in_camel_case() {
        let post = Post {
            id: 1,
            parent: 0,
            author: "ann".to_string(),
            message: "Hello Rust!".to_string(),
            thread: 7,
            forum: "rust".to_string(),
            created: chrono::Utc::now(),
            is_edited: false,
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["isEdited"], serde_json::json!(false));
        assert!(post.is_root());
    }

    #[test]
    fn thread_without_slug_omits_it() {
        let thread = Thread {
            id: 3,
            title: "t".into(),
            author: "ann".into(),
            forum: "rust".into(),
            message: "m".into(),
            slug: None,
            created: chrono::Utc::now(),
            votes: 0,
        };
        let json = serde_json::to_value(&thread).unwrap();
        assert!(json.get("slug").is_none());
    }

    #[test]
    fn blank_update_fields_keep_current_values() {
        let current = User {
            nickname: "ann".into(),
            fullname: "Ann Smith".into(),
            about: "hi".into(),
            email: "ann@example.com".into(),
        };
        let update = UserUpdate {
            fullname: "  ".into(),
            about: "new about".into(),
            email: String::new(),
        };
        let merged = update.merge_into(&current);
        assert_eq!(merged.fullname, "Ann Smith");
        assert_eq!(merged.about, "new about");
        assert_eq!(merged.email, "ann@example.com");
    }

    #[test]
    fn related_list_ignores_unknown_and_duplicates() {
        assert_eq!(
            Related::parse_list("user,thread,bogus,user"),
            vec![Related::User, Related::Thread]
        );
        assert!(Related::parse_list("").is_empty());
    }

    #[test]
    fn empty_thread_slug_counts_as_none() {
        let thread: NewThread = serde_json::from_value(serde_json::json!({
            "title": "t", "author": "a", "message": "m", "slug": ""
        }))
        .unwrap();
        assert_eq!(thread.slug(), None);
    }
}
