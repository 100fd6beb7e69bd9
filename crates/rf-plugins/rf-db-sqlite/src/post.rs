use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rf_core::error::StoreResult;
use rf_core::models::{NewPost, Post, Thread};
use rf_core::pagination::RootCursor;
use rf_core::traits::PostRepo;
use sqlx::{QueryBuilder, Sqlite};

use crate::{collect_rows, encode_time, post_from_row, wrap_err, SqliteStore, POST_COLUMNS};

/// Root ids bound per `IN (...)` query.
const ROOT_CHUNK: usize = 500;

#[async_trait]
impl PostRepo for SqliteStore {
    /// Inserts the whole batch in one transaction. A reply inherits the
    /// `root` of its parent; a top-level post is its own root.
    async fn create_posts(
        &self,
        thread: &Thread,
        posts: &[NewPost],
        created: DateTime<Utc>,
    ) -> StoreResult<Vec<Post>> {
        let mut tx = self.pool.begin().await.map_err(wrap_err)?;
        let insert = format!(
            "INSERT INTO posts (parent, root, author, message, thread, forum, created) \
             VALUES (?, COALESCE((SELECT root FROM posts WHERE id = ?), 0), ?, ?, ?, ?, ?) \
             RETURNING {POST_COLUMNS}"
        );

        let mut inserted = Vec::with_capacity(posts.len());
        for post in posts {
            let row = sqlx::query(&insert)
                .bind(post.parent)
                .bind(post.parent)
                .bind(&post.author)
                .bind(&post.message)
                .bind(thread.id)
                .bind(&thread.forum)
                .bind(encode_time(created))
                .fetch_one(&mut *tx)
                .await
                .map_err(wrap_err)?;
            let post = post_from_row(&row).map_err(wrap_err)?;

            if post.is_root() {
                sqlx::query("UPDATE posts SET root = id WHERE id = ?")
                    .bind(post.id)
                    .execute(&mut *tx)
                    .await
                    .map_err(wrap_err)?;
            }
            inserted.push(post);
        }

        tx.commit().await.map_err(wrap_err)?;
        Ok(inserted)
    }

    async fn get_post(&self, id: i64) -> StoreResult<Post> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(wrap_err)?;
        post_from_row(&row).map_err(wrap_err)
    }

    async fn get_root_post(&self, id: i64) -> StoreResult<Post> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = (SELECT root FROM posts WHERE id = ?)"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(wrap_err)?;
        post_from_row(&row).map_err(wrap_err)
    }

    async fn update_post_message(&self, id: i64, message: &str) -> StoreResult<Post> {
        let sql = format!(
            "UPDATE posts SET message = ?, is_edited = 1 WHERE id = ? RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(message)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(wrap_err)?;
        post_from_row(&row).map_err(wrap_err)
    }

    async fn list_posts_flat(
        &self,
        thread: i64,
        since: Option<i64>,
        desc: bool,
        limit: i64,
    ) -> StoreResult<Vec<Post>> {
        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {POST_COLUMNS} FROM posts WHERE thread = "));
        query.push_bind(thread);
        if let Some(since) = since {
            query
                .push(if desc { " AND id < " } else { " AND id > " })
                .push_bind(since);
        }
        push_order(&mut query, desc);
        query.push(" LIMIT ").push_bind(limit);

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(wrap_err)?;
        collect_rows(rows, post_from_row)
    }

    async fn list_root_posts(
        &self,
        thread: i64,
        cursor: RootCursor,
        desc: bool,
        limit: i64,
    ) -> StoreResult<Vec<Post>> {
        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {POST_COLUMNS} FROM posts WHERE thread = "));
        query.push_bind(thread).push(" AND parent = 0");

        let beyond = if desc { " < " } else { " > " };
        match cursor {
            RootCursor::Start => {}
            RootCursor::Id(id) => {
                query.push(" AND id").push(beyond).push_bind(id);
            }
            RootCursor::After { created, id } => {
                let created = encode_time(created);
                query
                    .push(" AND (created")
                    .push(beyond)
                    .push_bind(created)
                    .push(" OR (created = ")
                    .push_bind(created)
                    .push(" AND id")
                    .push(beyond)
                    .push_bind(id)
                    .push("))");
            }
        }
        push_order(&mut query, desc);
        query.push(" LIMIT ").push_bind(limit);

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(wrap_err)?;
        collect_rows(rows, post_from_row)
    }

    async fn list_subtrees(&self, thread: i64, roots: &[i64]) -> StoreResult<Vec<Post>> {
        let mut posts = Vec::new();
        for chunk in roots.chunks(ROOT_CHUNK) {
            let mut query = QueryBuilder::<Sqlite>::new(format!(
                "SELECT {POST_COLUMNS} FROM posts WHERE thread = "
            ));
            query.push_bind(thread).push(" AND root IN (");
            let mut ids = query.separated(", ");
            for id in chunk {
                ids.push_bind(*id);
            }
            ids.push_unseparated(")");

            let rows = query
                .build()
                .fetch_all(&self.pool)
                .await
                .map_err(wrap_err)?;
            posts.extend(collect_rows(rows, post_from_row)?);
        }
        Ok(posts)
    }
}

fn push_order(query: &mut QueryBuilder<'_, Sqlite>, desc: bool) {
    query.push(if desc {
        " ORDER BY created DESC, id DESC"
    } else {
        " ORDER BY created ASC, id ASC"
    });
}
