//! Listing parameters shared by the forum and thread listings.

use chrono::{DateTime, Utc};

/// Page size used when the caller omits `limit` or passes a non-positive one.
pub const DEFAULT_LIMIT: i64 = 100;

/// Normalizes a caller supplied limit. There is no upper bound.
pub fn effective_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(n) if n > 0 => n,
        _ => DEFAULT_LIMIT,
    }
}

/// How the posts of a thread are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    #[default]
    Flat,
    Tree,
    ParentTree,
}

impl SortMode {
    /// Unknown or missing modes fall back to `Flat`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("tree") => SortMode::Tree,
            Some("parent_tree") => SortMode::ParentTree,
            _ => SortMode::Flat,
        }
    }
}

/// Post listing request for one thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPage {
    pub sort: SortMode,
    /// Post id cursor, exclusive
    pub since: Option<i64>,
    pub desc: bool,
    pub limit: Option<i64>,
}

impl PostPage {
    pub fn limit(&self) -> i64 {
        effective_limit(self.limit)
    }
}

/// Thread listing request for one forum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadPage {
    /// Creation time cursor, inclusive
    pub since: Option<DateTime<Utc>>,
    pub desc: bool,
    pub limit: Option<i64>,
}

impl ThreadPage {
    pub fn limit(&self) -> i64 {
        effective_limit(self.limit)
    }
}

/// Participant listing request for one forum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPage {
    /// Nickname cursor, exclusive
    pub since: Option<String>,
    pub desc: bool,
    pub limit: Option<i64>,
}

impl UserPage {
    pub fn limit(&self) -> i64 {
        effective_limit(self.limit)
    }
}

/// Where a page of root posts starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootCursor {
    /// From the first (or, descending, the last) root.
    Start,
    /// Roots whose id is beyond the given post id.
    Id(i64),
    /// Roots strictly beyond the given root in (created, id) order.
    After { created: DateTime<Utc>, id: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_when_missing_or_not_positive() {
        assert_eq!(effective_limit(None), 100);
        assert_eq!(effective_limit(Some(0)), 100);
        assert_eq!(effective_limit(Some(-5)), 100);
        assert_eq!(effective_limit(Some(3)), 3);
        assert_eq!(effective_limit(Some(10_000)), 10_000);
    }

    #[test]
    fn sort_mode_falls_back_to_flat() {
        assert_eq!(SortMode::parse(None), SortMode::Flat);
        assert_eq!(SortMode::parse(Some("flat")), SortMode::Flat);
        assert_eq!(SortMode::parse(Some("tree")), SortMode::Tree);
        assert_eq!(SortMode::parse(Some("parent_tree")), SortMode::ParentTree);
        assert_eq!(SortMode::parse(Some("TREE")), SortMode::Flat);
        assert_eq!(SortMode::parse(Some("random")), SortMode::Flat);
    }
}
