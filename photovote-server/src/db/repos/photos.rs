//! Photo repository
//!
//! - create: per-category quota checked under a lock on the owner row
//! - image_urls: one `= ANY($1)` lookup for a whole batch

use sqlx::{FromRow, PgPool};
use serde::Serialize;

use super::DbError;
use crate::models::{CategoryId, NewPhoto, PhotoId, UserId, MAX_PHOTOS_PER_CATEGORY};

/// Leaderboard size for the unfiltered photo list
const TOP_PHOTOS_LIMIT: i64 = 50;

/// One of the caller's own photos
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct OwnPhoto {
    pub id: PhotoId,
    pub rating: i64,
    pub category_name: String,
    pub category_id: CategoryId,
}

/// Photo on the global leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct RankedPhoto {
    pub id: PhotoId,
    pub rating: i64,
    pub category_name: String,
    pub category_id: CategoryId,
    pub username: String,
}

/// Photo repository
pub struct PhotoRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PhotoRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Photos owned by `owner`, grouped by category display order.
    pub async fn list_for_owner(&self, owner: UserId) -> Result<Vec<OwnPhoto>, DbError> {
        let photos = sqlx::query_as::<_, OwnPhoto>(
            r#"
            SELECT p.id, p.rating, c.name AS category_name, c.id AS category_id
            FROM photos p
            JOIN categories c ON p.category_id = c.id
            WHERE p.user_id = $1
            ORDER BY c.display_order, p.created_at
            "#,
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;
        Ok(photos)
    }

    /// Highest rated photos across all users.
    pub async fn top_rated(&self) -> Result<Vec<RankedPhoto>, DbError> {
        let photos = sqlx::query_as::<_, RankedPhoto>(
            r#"
            SELECT p.id, p.rating, c.name AS category_name, c.id AS category_id, u.username
            FROM photos p
            JOIN categories c ON p.category_id = c.id
            JOIN users u ON p.user_id = u.id
            ORDER BY p.rating DESC, p.id
            LIMIT $1
            "#,
        )
        .bind(TOP_PHOTOS_LIMIT)
        .fetch_all(self.pool)
        .await?;
        Ok(photos)
    }

    /// Insert a photo unless the owner already filled the category.
    ///
    /// Creates for one owner are serialized on their `users` row, so the
    /// count each insert checks includes every earlier committed insert.
    pub async fn create(&self, photo: &NewPhoto) -> Result<PhotoId, DbError> {
        let mut tx = self.pool.begin().await?;

        // NO KEY UPDATE leaves foreign-key checks from votes unblocked
        sqlx::query("SELECT 1 FROM users WHERE id = $1 FOR NO KEY UPDATE")
            .bind(photo.owner)
            .execute(&mut *tx)
            .await?;

        let id: Option<PhotoId> = sqlx::query_scalar(
            r#"
            INSERT INTO photos (user_id, category_id, image_url)
            SELECT $1, $2, $3
            WHERE (
                SELECT COUNT(*) FROM photos WHERE user_id = $1 AND category_id = $2
            ) < $4
            RETURNING id
            "#,
        )
        .bind(photo.owner)
        .bind(photo.category)
        .bind(&photo.image_url)
        .bind(MAX_PHOTOS_PER_CATEGORY)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(id) = id else {
            return Err(DbError::LimitReached {
                what: "photos per category",
                max: MAX_PHOTOS_PER_CATEGORY,
            });
        };
        tx.commit().await?;
        Ok(id)
    }

    /// `image_url` for each requested id that exists.
    pub async fn image_urls(&self, ids: &[PhotoId]) -> Result<Vec<(PhotoId, String)>, DbError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let rows = sqlx::query_as::<_, (PhotoId, String)>(
            "SELECT id, image_url FROM photos WHERE id = ANY($1)",
        )
        .bind(&raw)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
