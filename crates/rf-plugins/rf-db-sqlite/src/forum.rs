use async_trait::async_trait;
use rf_core::error::StoreResult;
use rf_core::models::{Forum, NewForum, Thread, User};
use rf_core::pagination::{ThreadPage, UserPage};
use rf_core::traits::ForumRepo;
use sqlx::{QueryBuilder, Sqlite};

use crate::{
    collect_rows, encode_time, forum_from_row, thread_from_row, user_from_row, wrap_err,
    SqliteStore, FORUM_COLUMNS, THREAD_COLUMNS,
};

#[async_trait]
impl ForumRepo for SqliteStore {
    async fn create_forum(&self, forum: &NewForum) -> StoreResult<()> {
        sqlx::query("INSERT INTO forums (slug, title, owner) VALUES (?, ?, ?)")
            .bind(&forum.slug)
            .bind(&forum.title)
            .bind(&forum.user)
            .execute(&self.pool)
            .await
            .map_err(wrap_err)?;
        Ok(())
    }

    async fn get_forum(&self, slug: &str) -> StoreResult<Forum> {
        let sql = format!("SELECT {FORUM_COLUMNS} FROM forums WHERE slug = ?");
        let row = sqlx::query(&sql)
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(wrap_err)?;
        forum_from_row(&row).map_err(wrap_err)
    }

    /// Threads by creation time; `since` is an inclusive bound.
    async fn list_forum_threads(&self, slug: &str, page: &ThreadPage) -> StoreResult<Vec<Thread>> {
        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {THREAD_COLUMNS} FROM threads WHERE forum = "));
        query.push_bind(slug);
        if let Some(since) = page.since {
            query
                .push(if page.desc { " AND created <= " } else { " AND created >= " })
                .push_bind(encode_time(since));
        }
        query
            .push(if page.desc {
                " ORDER BY created DESC, id DESC LIMIT "
            } else {
                " ORDER BY created ASC, id ASC LIMIT "
            })
            .push_bind(page.limit());

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(wrap_err)?;
        collect_rows(rows, thread_from_row)
    }

    /// Participants by nickname; `since` is an exclusive bound.
    async fn list_forum_users(&self, slug: &str, page: &UserPage) -> StoreResult<Vec<User>> {
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT u.nickname, u.fullname, u.about, u.email \
             FROM forum_users fu JOIN users u ON u.nickname = fu.nickname \
             WHERE fu.forum = ",
        );
        query.push_bind(slug);
        if let Some(since) = &page.since {
            query
                .push(if page.desc { " AND u.nickname < " } else { " AND u.nickname > " })
                .push_bind(since.as_str());
        }
        query
            .push(if page.desc {
                " ORDER BY u.nickname DESC LIMIT "
            } else {
                " ORDER BY u.nickname ASC LIMIT "
            })
            .push_bind(page.limit());

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(wrap_err)?;
        collect_rows(rows, user_from_row)
    }
}
