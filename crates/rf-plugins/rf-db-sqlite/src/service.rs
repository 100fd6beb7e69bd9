use async_trait::async_trait;
use rf_core::error::StoreResult;
use rf_core::models::ServiceStatus;
use rf_core::traits::ServiceRepo;
use sqlx::Row;

use crate::{wrap_err, SqliteStore};

#[async_trait]
impl ServiceRepo for SqliteStore {
    async fn status(&self) -> StoreResult<ServiceStatus> {
        let row = sqlx::query(
            "SELECT (SELECT count(*) FROM users) AS users, \
                    (SELECT count(*) FROM forums) AS forums, \
                    (SELECT count(*) FROM threads) AS threads, \
                    (SELECT count(*) FROM posts) AS posts",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(wrap_err)?;

        Ok(ServiceStatus {
            user: row.try_get("users").map_err(wrap_err)?,
            forum: row.try_get("forums").map_err(wrap_err)?,
            thread: row.try_get("threads").map_err(wrap_err)?,
            post: row.try_get("posts").map_err(wrap_err)?,
        })
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(wrap_err)?;
        // children before parents
        for table in ["votes", "forum_users", "posts", "threads", "forums", "users"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await
                .map_err(wrap_err)?;
        }
        tx.commit().await.map_err(wrap_err)?;
        Ok(())
    }
}
