use async_trait::async_trait;
use chrono::Utc;
use rf_core::error::StoreResult;
use rf_core::models::{NewThread, Thread};
use rf_core::traits::ThreadRepo;

use crate::{encode_time, thread_from_row, wrap_err, SqliteStore, THREAD_COLUMNS};

#[async_trait]
impl ThreadRepo for SqliteStore {
    async fn create_thread(&self, forum: &str, thread: &NewThread) -> StoreResult<Thread> {
        let created = thread.created.unwrap_or_else(Utc::now);
        let sql = format!(
            "INSERT INTO threads (title, author, forum, message, slug, created) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {THREAD_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&thread.title)
            .bind(&thread.author)
            .bind(forum)
            .bind(&thread.message)
            .bind(thread.slug())
            .bind(encode_time(created))
            .fetch_one(&self.pool)
            .await
            .map_err(wrap_err)?;
        thread_from_row(&row).map_err(wrap_err)
    }

    async fn get_thread_by_id(&self, id: i64) -> StoreResult<Thread> {
        let sql = format!("SELECT {THREAD_COLUMNS} FROM threads WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(wrap_err)?;
        thread_from_row(&row).map_err(wrap_err)
    }

    async fn get_thread_by_slug(&self, slug: &str) -> StoreResult<Thread> {
        let sql = format!("SELECT {THREAD_COLUMNS} FROM threads WHERE slug = ?");
        let row = sqlx::query(&sql)
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(wrap_err)?;
        thread_from_row(&row).map_err(wrap_err)
    }

    async fn update_thread(&self, id: i64, title: &str, message: &str) -> StoreResult<Thread> {
        let sql = format!(
            "UPDATE threads SET title = ?, message = ? WHERE id = ? RETURNING {THREAD_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(title)
            .bind(message)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(wrap_err)?;
        thread_from_row(&row).map_err(wrap_err)
    }
}
