//! Schema bootstrap
//!
//! Idempotent: every statement is `IF NOT EXISTS`, so this runs on each
//! server start.

use sqlx::PgPool;

use super::DbError;

/// Create all photovote tables and indexes
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running photovote migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            display_order INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS photos (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            category_id BIGINT NOT NULL REFERENCES categories(id),
            image_url TEXT NOT NULL,
            rating BIGINT NOT NULL DEFAULT 0,
            views_count BIGINT NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS votes (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            photo1_id BIGINT NOT NULL REFERENCES photos(id) ON DELETE CASCADE,
            photo2_id BIGINT NOT NULL REFERENCES photos(id) ON DELETE CASCADE,
            winner_photo_id BIGINT NOT NULL REFERENCES photos(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shown_photos (
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            photo_id BIGINT NOT NULL REFERENCES photos(id) ON DELETE CASCADE,
            shown_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            PRIMARY KEY (user_id, photo_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_activity (
            user_id BIGINT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
            activity_count BIGINT NOT NULL DEFAULT 0,
            last_reset_date DATE NOT NULL DEFAULT CURRENT_DATE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // photo_id is NULL on per-user activity rows
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS daily_stats (
            id BIGSERIAL PRIMARY KEY,
            snapshot_date DATE NOT NULL,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            photo_id BIGINT REFERENCES photos(id) ON DELETE CASCADE,
            activity_count BIGINT,
            photo_rating BIGINT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("photovote migrations complete");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_photos_category_views ON photos(category_id, views_count)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_photos_user ON photos(user_id, category_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_photos_rating ON photos(rating DESC)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_votes_user ON votes(user_id)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_user_activity_count ON user_activity(activity_count DESC)",
    )
    .execute(pool)
    .await?;

    // Conflict target for snapshot upserts
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_daily_stats_snapshot
        ON daily_stats (snapshot_date, user_id, (COALESCE(photo_id, 0)))
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
