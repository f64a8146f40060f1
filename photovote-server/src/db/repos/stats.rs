//! Leaderboard and per-user statistics
//!
//! Read-only. Per-category rollups use DISTINCT ON / GROUP BY instead of a
//! query per category.

use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::DbError;
use crate::models::{PhotoId, UserId};

/// Number of users on the activity leaderboard
const TOP_USERS_LIMIT: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct TopUser {
    pub id: UserId,
    pub username: String,
    pub activity_count: i64,
}

/// Best photo overall or within one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct LeadingPhoto {
    pub id: PhotoId,
    pub rating: i64,
    pub category_name: String,
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub activity: i64,
    pub best_photo_rating: i64,
    /// 1 + users with strictly more activity; None without an activity row
    pub rank: Option<i64>,
    pub photos_by_category: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub top_users: Vec<TopUser>,
    pub top_photo: Option<LeadingPhoto>,
    pub top_photos_by_category: Vec<LeadingPhoto>,
    pub user_stats: UserStats,
}

/// Stats repository
pub struct StatsRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Full stats payload, with the personal section filled when `user` is set.
    pub async fn collect(&self, user: Option<UserId>) -> Result<Stats, DbError> {
        let top_users = self.top_users().await?;
        let top_photo = self.top_photo().await?;
        let top_photos_by_category = self.top_photos_by_category().await?;
        let user_stats = match user {
            Some(user) => self.user_stats(user).await?,
            None => UserStats::default(),
        };

        Ok(Stats {
            top_users,
            top_photo,
            top_photos_by_category,
            user_stats,
        })
    }

    pub async fn top_users(&self) -> Result<Vec<TopUser>, DbError> {
        let users = sqlx::query_as::<_, TopUser>(
            r#"
            SELECT u.id, u.username, COALESCE(ua.activity_count, 0) AS activity_count
            FROM users u
            LEFT JOIN user_activity ua ON u.id = ua.user_id
            ORDER BY ua.activity_count DESC NULLS LAST, u.id
            LIMIT $1
            "#,
        )
        .bind(TOP_USERS_LIMIT)
        .fetch_all(self.pool)
        .await?;
        Ok(users)
    }

    pub async fn top_photo(&self) -> Result<Option<LeadingPhoto>, DbError> {
        let photo = sqlx::query_as::<_, LeadingPhoto>(
            r#"
            SELECT p.id, p.rating, c.name AS category_name, u.username
            FROM photos p
            JOIN categories c ON p.category_id = c.id
            JOIN users u ON p.user_id = u.id
            ORDER BY p.rating DESC, p.id
            LIMIT 1
            "#,
        )
        .fetch_optional(self.pool)
        .await?;
        Ok(photo)
    }

    /// Best photo of every non-empty category, in display order.
    pub async fn top_photos_by_category(&self) -> Result<Vec<LeadingPhoto>, DbError> {
        let photos = sqlx::query_as::<_, LeadingPhoto>(
            r#"
            SELECT id, rating, category_name, username
            FROM (
                SELECT DISTINCT ON (c.id)
                    p.id, p.rating, c.name AS category_name, u.username,
                    c.display_order, c.id AS category_id
                FROM photos p
                JOIN categories c ON p.category_id = c.id
                JOIN users u ON p.user_id = u.id
                ORDER BY c.id, p.rating DESC, p.id
            ) best
            ORDER BY display_order, category_id
            "#,
        )
        .fetch_all(self.pool)
        .await?;
        Ok(photos)
    }

    pub async fn user_stats(&self, user: UserId) -> Result<UserStats, DbError> {
        let (activity, best_photo_rating, rank): (Option<i64>, i64, Option<i64>) =
            sqlx::query_as(
                r#"
                SELECT
                    ua.activity_count,
                    (SELECT COALESCE(MAX(rating), 0) FROM photos WHERE user_id = q.uid),
                    CASE WHEN ua.user_id IS NULL THEN NULL ELSE (
                        SELECT COUNT(*) + 1 FROM user_activity o
                        WHERE o.activity_count > ua.activity_count
                    ) END
                FROM (SELECT $1::BIGINT AS uid) q
                LEFT JOIN user_activity ua ON ua.user_id = q.uid
                "#,
            )
            .bind(user)
            .fetch_one(self.pool)
            .await?;

        let per_category: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT c.name, COALESCE(MAX(p.rating), 0)
            FROM categories c
            LEFT JOIN photos p ON p.category_id = c.id AND p.user_id = $1
            GROUP BY c.id, c.name
            "#,
        )
        .bind(user)
        .fetch_all(self.pool)
        .await?;

        Ok(UserStats {
            activity: activity.unwrap_or(0),
            best_photo_rating,
            rank,
            photos_by_category: per_category.into_iter().collect(),
        })
    }
}
