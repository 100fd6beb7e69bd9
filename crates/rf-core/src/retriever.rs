//! # Hierarchical post retrieval
//!
//! `flat` is a single ordered query. `tree` and `parent_tree` first pick a
//! page of root posts, then fetch every post under those roots and lay them
//! out depth first. Pagination therefore always selects whole root
//! subtrees, never individual replies.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{OptionalExt, StoreResult};
use crate::models::Post;
use crate::pagination::{PostPage, RootCursor, SortMode};
use crate::traits::PostRepo;

/// Lists the posts of `thread` according to `page`.
///
/// The caller is responsible for checking that the thread exists.
pub async fn list_posts<R>(repo: &R, thread: i64, page: &PostPage) -> StoreResult<Vec<Post>>
where
    R: PostRepo + ?Sized,
{
    let limit = page.limit();
    match page.sort {
        SortMode::Flat => repo.list_posts_flat(thread, page.since, page.desc, limit).await,
        SortMode::Tree | SortMode::ParentTree => {
            let cursor = match page.since {
                Some(since) => root_cursor(repo, thread, since).await?,
                None => RootCursor::Start,
            };
            list_forest(repo, thread, cursor, page.desc, limit).await
        }
    }
}

/// A tree cursor may name any post, reply or root; the page resumes after
/// its root.
async fn root_cursor<R>(repo: &R, thread: i64, since: i64) -> StoreResult<RootCursor>
where
    R: PostRepo + ?Sized,
{
    let cursor = match repo.get_root_post(since).await.optional()? {
        Some(root) if root.thread == thread => RootCursor::After {
            created: root.created,
            id: root.id,
        },
        _ => RootCursor::Id(since),
    };
    Ok(cursor)
}

async fn list_forest<R>(
    repo: &R,
    thread: i64,
    cursor: RootCursor,
    desc: bool,
    limit: i64,
) -> StoreResult<Vec<Post>>
where
    R: PostRepo + ?Sized,
{
    let roots = repo.list_root_posts(thread, cursor, desc, limit).await?;
    if roots.is_empty() {
        return Ok(Vec::new());
    }

    let root_ids: Vec<i64> = roots.iter().map(|root| root.id).collect();
    let members = repo.list_subtrees(thread, &root_ids).await?;
    log::debug!(
        "thread {thread}: {} roots, {} posts in page",
        root_ids.len(),
        members.len()
    );
    Ok(arrange_forest(&root_ids, members, desc))
}

/// Orders `posts` depth first: each root in `roots` order, immediately
/// followed by its subtree. Siblings at every depth are ordered by
/// (created, id), reversed when `desc` is set.
///
/// Posts whose root is not listed in `roots` are dropped.
pub fn arrange_forest(roots: &[i64], posts: Vec<Post>, desc: bool) -> Vec<Post> {
    let total = posts.len();
    let mut heads: HashMap<i64, Post> = HashMap::new();
    let mut children: HashMap<i64, Vec<Post>> = HashMap::new();
    for post in posts {
        if post.is_root() {
            heads.insert(post.id, post);
        } else {
            children.entry(post.parent).or_default().push(post);
        }
    }

    // Sorted in reverse so the stack pops them in display order.
    for siblings in children.values_mut() {
        siblings.sort_by(|a, b| sibling_order(b, a, desc));
    }

    let mut ordered = Vec::with_capacity(total);
    for root_id in roots {
        let Some(root) = heads.remove(root_id) else {
            continue;
        };
        let mut stack = vec![root];
        while let Some(post) = stack.pop() {
            if let Some(replies) = children.remove(&post.id) {
                stack.extend(replies);
            }
            ordered.push(post);
        }
    }
    ordered
}

fn sibling_order(a: &Post, b: &Post, desc: bool) -> Ordering {
    let ord = a.created.cmp(&b.created).then(a.id.cmp(&b.id));
    if desc {
        ord.reverse()
    } else {
        ord
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::traits::MockPostRepo;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(offset: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::seconds(offset)
    }

    fn post(id: i64, parent: i64, created: i64) -> Post {
        Post {
            id,
            parent,
            author: "ann".into(),
            message: format!("post {id}"),
            thread: 1,
            forum: "rust".into(),
            created: at(created),
            is_edited: false,
        }
    }

    fn ids(posts: &[Post]) -> Vec<i64> {
        posts.iter().map(|p| p.id).collect()
    }

    #[test]
    fn each_root_is_followed_by_its_subtree() {
        // A=1 { A1=3, A2=4 }, B=2
        let posts = vec![post(4, 1, 4), post(2, 0, 2), post(1, 0, 1), post(3, 1, 3)];
        let ordered = arrange_forest(&[1], posts, false);
        assert_eq!(ids(&ordered), vec![1, 3, 4]);
    }

    #[test]
    fn nested_replies_are_depth_first() {
        // 1 { 2 { 5 }, 3 { 4 } }, 6
        let posts = vec![
            post(1, 0, 1),
            post(2, 1, 2),
            post(3, 1, 3),
            post(4, 3, 4),
            post(5, 2, 5),
            post(6, 0, 6),
        ];
        let ordered = arrange_forest(&[1, 6], posts, false);
        assert_eq!(ids(&ordered), vec![1, 2, 5, 3, 4, 6]);
    }

    #[test]
    fn descending_reverses_siblings_at_every_depth() {
        let posts = vec![
            post(1, 0, 1),
            post(2, 1, 2),
            post(3, 1, 3),
            post(4, 3, 4),
            post(5, 3, 5),
            post(6, 0, 6),
        ];
        let ordered = arrange_forest(&[6, 1], posts, true);
        assert_eq!(ids(&ordered), vec![6, 1, 3, 5, 4, 2]);
    }

    #[test]
    fn siblings_with_equal_timestamps_order_by_id() {
        let posts = vec![post(1, 0, 0), post(7, 1, 5), post(3, 1, 5), post(5, 1, 5)];
        assert_eq!(ids(&arrange_forest(&[1], posts.clone(), false)), vec![1, 3, 5, 7]);
        assert_eq!(ids(&arrange_forest(&[1], posts, true)), vec![1, 7, 5, 3]);
    }

    #[test]
    fn creation_time_wins_over_id() {
        let posts = vec![post(1, 0, 0), post(2, 1, 9), post(3, 1, 4)];
        assert_eq!(ids(&arrange_forest(&[1], posts, false)), vec![1, 3, 2]);
    }

    #[test]
    fn unknown_roots_are_skipped() {
        let posts = vec![post(1, 0, 0), post(2, 1, 1)];
        assert_eq!(ids(&arrange_forest(&[99, 1], posts, false)), vec![1, 2]);
        assert!(arrange_forest(&[], vec![post(1, 0, 0)], false).is_empty());
    }

    #[tokio::test]
    async fn flat_passes_cursor_and_default_limit_through() {
        let mut repo = MockPostRepo::new();
        repo.expect_list_posts_flat()
            .withf(|thread, since, desc, limit| {
                *thread == 1 && *since == Some(2) && !*desc && *limit == 100
            })
            .returning(|_, _, _, _| Ok(vec![post(3, 0, 3)]));
        repo.expect_list_root_posts().never();

        let page = PostPage { since: Some(2), ..PostPage::default() };
        let posts = list_posts(&repo, 1, &page).await.unwrap();
        assert_eq!(ids(&posts), vec![3]);
    }

    #[tokio::test]
    async fn tree_cursor_on_a_reply_resumes_after_its_root() {
        let mut repo = MockPostRepo::new();
        repo.expect_get_root_post()
            .withf(|id| *id == 5)
            .returning(|_| Ok(post(4, 0, 4)));
        repo.expect_list_root_posts()
            .withf(|_, cursor, desc, limit| {
                *cursor == RootCursor::After { created: at(4), id: 4 } && *desc && *limit == 1
            })
            .returning(|_, _, _, _| Ok(vec![post(1, 0, 1)]));
        repo.expect_list_subtrees()
            .withf(|_, roots| roots == [1].as_slice())
            .returning(|_, _| Ok(vec![post(1, 0, 1), post(3, 1, 3), post(2, 1, 2)]));

        let page = PostPage {
            sort: SortMode::Tree,
            since: Some(5),
            desc: true,
            limit: Some(1),
        };
        let posts = list_posts(&repo, 1, &page).await.unwrap();
        assert_eq!(ids(&posts), vec![1, 3, 2]);
    }

    #[tokio::test]
    async fn parent_tree_resumes_after_the_cursor_root() {
        let mut repo = MockPostRepo::new();
        repo.expect_get_root_post()
            .withf(|id| *id == 8)
            .returning(|_| Ok(post(4, 0, 4)));
        repo.expect_list_root_posts()
            .withf(|_, cursor, _, _| *cursor == RootCursor::After { created: at(4), id: 4 })
            .returning(|_, _, _, _| Ok(vec![post(6, 0, 6)]));
        repo.expect_list_subtrees()
            .returning(|_, _| Ok(vec![post(6, 0, 6), post(9, 6, 9)]));

        let page = PostPage {
            sort: SortMode::ParentTree,
            since: Some(8),
            ..PostPage::default()
        };
        let posts = list_posts(&repo, 1, &page).await.unwrap();
        assert_eq!(ids(&posts), vec![6, 9]);
    }

    #[tokio::test]
    async fn cursor_outside_thread_compares_ids() {
        let mut repo = MockPostRepo::new();
        repo.expect_get_root_post()
            .returning(|_| Err(StoreError::NotFound));
        repo.expect_list_root_posts()
            .withf(|_, cursor, _, _| *cursor == RootCursor::Id(77))
            .returning(|_, _, _, _| Ok(Vec::new()));
        repo.expect_list_subtrees().never();

        let page = PostPage {
            sort: SortMode::ParentTree,
            since: Some(77),
            ..PostPage::default()
        };
        assert!(list_posts(&repo, 1, &page).await.unwrap().is_empty());
    }
}
