use anyhow::anyhow;
use async_trait::async_trait;
use rf_core::error::{StoreError, StoreResult};
use rf_core::models::{Vote, Voice};
use rf_core::traits::VoteRepo;
use rf_core::votes::{CastVote, VoteEffect};

use crate::{thread_from_row, wrap_err, SqliteStore, THREAD_COLUMNS};

#[async_trait]
impl VoteRepo for SqliteStore {
    /// The insert attempt comes first so the transaction holds the write
    /// lock before the previous voice is read. Dropping `tx` on any early
    /// return rolls everything back.
    async fn cast_vote(&self, vote: &Vote) -> StoreResult<CastVote> {
        let mut tx = self.pool.begin().await.map_err(wrap_err)?;

        let inserted = sqlx::query(
            "INSERT INTO votes (nickname, thread, voice) VALUES (?, ?, ?) \
             ON CONFLICT (nickname, thread) DO NOTHING",
        )
        .bind(&vote.nickname)
        .bind(vote.thread)
        .bind(vote.voice.value())
        .execute(&mut *tx)
        .await
        .map_err(wrap_err)?
        .rows_affected();

        let effect = if inserted == 1 {
            VoteEffect::Inserted(vote.voice)
        } else {
            let stored: i64 = sqlx::query_scalar("SELECT voice FROM votes WHERE nickname = ? AND thread = ?")
                .bind(&vote.nickname)
                .bind(vote.thread)
                .fetch_one(&mut *tx)
                .await
                .map_err(wrap_err)?;
            let previous = Voice::try_from(stored)
                .map_err(|raw| StoreError::Backend(anyhow!("stored voice out of range: {raw}")))?;
            let effect = VoteEffect::between(Some(previous), vote.voice);
            if effect.writes() {
                sqlx::query("UPDATE votes SET voice = ? WHERE nickname = ? AND thread = ?")
                    .bind(vote.voice.value())
                    .bind(&vote.nickname)
                    .bind(vote.thread)
                    .execute(&mut *tx)
                    .await
                    .map_err(wrap_err)?;
            }
            effect
        };

        let sql = format!("UPDATE threads SET votes = votes + ? WHERE id = ? RETURNING {THREAD_COLUMNS}");
        let row = sqlx::query(&sql)
            .bind(effect.delta())
            .bind(vote.thread)
            .fetch_one(&mut *tx)
            .await
            .map_err(wrap_err)?;
        let thread = thread_from_row(&row).map_err(wrap_err)?;

        tx.commit().await.map_err(wrap_err)?;
        log::debug!("vote by {} on thread {}: {:?}", vote.nickname, vote.thread, effect);
        Ok(CastVote { thread, effect })
    }
}
