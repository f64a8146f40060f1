//! Postgres-backed voting store
//!
//! Pair candidates come from one query per category; vote writes share a
//! single `sqlx::Transaction`, which rolls back if dropped uncommitted.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};

use super::DbError;
use crate::models::{CategoryId, PhotoId, UserId, VoteSubmission};
use crate::voting::{Category, PairPhoto, VoteTransaction, VotingStore};

/// Voting store over a connection pool
#[derive(Clone)]
pub struct PgVotingStore {
    pool: PgPool,
}

impl PgVotingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VotingStore for PgVotingStore {
    async fn categories(&self) -> Result<Vec<Category>, DbError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, display_order FROM categories ORDER BY display_order, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn unseen_candidates(
        &self,
        category: CategoryId,
        voter: UserId,
        limit: i64,
    ) -> Result<Vec<PairPhoto>, DbError> {
        let photos = sqlx::query_as::<_, PairPhoto>(
            r#"
            SELECT p.id, p.rating, p.views_count
            FROM photos p
            WHERE p.category_id = $1
              AND p.user_id <> $2
              AND NOT EXISTS (
                  SELECT 1 FROM shown_photos s
                  WHERE s.user_id = $2 AND s.photo_id = p.id
              )
            ORDER BY p.views_count ASC, RANDOM()
            LIMIT $3
            "#,
        )
        .bind(category)
        .bind(voter)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(photos)
    }

    async fn begin(&self) -> Result<Box<dyn VoteTransaction>, DbError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgVoteTransaction { tx }))
    }
}

/// One vote's worth of writes
pub struct PgVoteTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl VoteTransaction for PgVoteTransaction {
    async fn insert_vote(&mut self, vote: &VoteSubmission) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO votes (user_id, photo1_id, photo2_id, winner_photo_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(vote.voter)
        .bind(vote.photo1)
        .bind(vote.photo2)
        .bind(vote.winner)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn increment_rating(&mut self, photo: PhotoId) -> Result<(), DbError> {
        sqlx::query("UPDATE photos SET rating = rating + 1 WHERE id = $1")
            .bind(photo)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn mark_shown(&mut self, voter: UserId, photos: [PhotoId; 2]) -> Result<(), DbError> {
        let [first, second] = photos;
        sqlx::query(
            r#"
            INSERT INTO shown_photos (user_id, photo_id)
            VALUES ($1, $2), ($1, $3)
            ON CONFLICT (user_id, photo_id) DO NOTHING
            "#,
        )
        .bind(voter)
        .bind(first)
        .bind(second)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn increment_views(&mut self, photos: [PhotoId; 2]) -> Result<(), DbError> {
        let [first, second] = photos;
        sqlx::query("UPDATE photos SET views_count = views_count + 1 WHERE id IN ($1, $2)")
            .bind(first)
            .bind(second)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn increment_activity(
        &mut self,
        voter: UserId,
        today: NaiveDate,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO user_activity (user_id, activity_count, last_reset_date)
            VALUES ($1, 1, $2)
            ON CONFLICT (user_id) DO UPDATE
            SET activity_count = user_activity.activity_count + 1
            "#,
        )
        .bind(voter)
        .bind(today)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DbError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DbError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
