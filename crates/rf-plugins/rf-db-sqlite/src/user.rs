use async_trait::async_trait;
use rf_core::error::StoreResult;
use rf_core::models::User;
use rf_core::traits::UserRepo;

use crate::{collect_rows, user_from_row, wrap_err, SqliteStore, USER_COLUMNS};

#[async_trait]
impl UserRepo for SqliteStore {
    async fn create_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query("INSERT INTO users (nickname, fullname, about, email) VALUES (?, ?, ?, ?)")
            .bind(&user.nickname)
            .bind(&user.fullname)
            .bind(&user.about)
            .bind(&user.email)
            .execute(&self.pool)
            .await
            .map_err(wrap_err)?;
        Ok(())
    }

    async fn get_user(&self, nickname: &str) -> StoreResult<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE nickname = ?");
        let row = sqlx::query(&sql)
            .bind(nickname)
            .fetch_one(&self.pool)
            .await
            .map_err(wrap_err)?;
        user_from_row(&row).map_err(wrap_err)
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(wrap_err)?;
        user_from_row(&row).map_err(wrap_err)
    }

    async fn find_conflicting_users(&self, nickname: &str, email: &str) -> StoreResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE nickname = ? OR email = ? ORDER BY nickname"
        );
        let rows = sqlx::query(&sql)
            .bind(nickname)
            .bind(email)
            .fetch_all(&self.pool)
            .await
            .map_err(wrap_err)?;
        collect_rows(rows, user_from_row)
    }

    async fn update_user(&self, user: &User) -> StoreResult<User> {
        let sql = format!(
            "UPDATE users SET fullname = ?, about = ?, email = ? WHERE nickname = ? RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&user.fullname)
            .bind(&user.about)
            .bind(&user.email)
            .bind(&user.nickname)
            .fetch_one(&self.pool)
            .await
            .map_err(wrap_err)?;
        user_from_row(&row).map_err(wrap_err)
    }
}
