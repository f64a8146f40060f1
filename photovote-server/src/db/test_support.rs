//! Postgres fixtures for `#[ignore = "requires database"]` tests
//!
//! Each fixture owns a throwaway schema: the pool pins `search_path` to it,
//! migrations run inside it, and `cleanup` drops it.

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use uuid::Uuid;

use super::migrations;
use crate::models::{CategoryId, PhotoId, UserId};

pub(crate) struct Fixture {
    pool: PgPool,
    schema: String,
}

impl Fixture {
    pub(crate) async fn new() -> Self {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let schema = format!("pv_test_{}", Uuid::new_v4().simple());

        let admin = PgPool::connect(&url).await.expect("connect failed");
        admin
            .execute(format!("CREATE SCHEMA {schema}").as_str())
            .await
            .expect("create schema failed");
        admin.close().await;

        let search_path = format!("SET search_path TO {schema}");
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .after_connect(move |conn, _meta| {
                let sql = search_path.clone();
                Box::pin(async move {
                    conn.execute(sql.as_str()).await?;
                    Ok(())
                })
            })
            .connect(&url)
            .await
            .expect("pool creation failed");

        migrations::run(&pool).await.expect("migrations failed");
        Self { pool, schema }
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub(crate) async fn user(&self, username: &str) -> UserId {
        sqlx::query_scalar("INSERT INTO users (username) VALUES ($1) RETURNING id")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .expect("insert user failed")
    }

    pub(crate) async fn category(&self, name: &str, display_order: i32) -> CategoryId {
        sqlx::query_scalar(
            "INSERT INTO categories (name, display_order) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(display_order)
        .fetch_one(&self.pool)
        .await
        .expect("insert category failed")
    }

    pub(crate) async fn photo(&self, owner: UserId, category: CategoryId) -> PhotoId {
        self.rated_photo(owner, category, 0).await
    }

    pub(crate) async fn rated_photo(
        &self,
        owner: UserId,
        category: CategoryId,
        rating: i64,
    ) -> PhotoId {
        sqlx::query_scalar(
            r#"
            INSERT INTO photos (user_id, category_id, image_url, rating)
            VALUES ($1, $2, 'https://img.test/' || md5(random()::text), $3)
            RETURNING id
            "#,
        )
        .bind(owner)
        .bind(category)
        .bind(rating)
        .fetch_one(&self.pool)
        .await
        .expect("insert photo failed")
    }

    pub(crate) async fn shown(&self, voter: UserId, photo: PhotoId) {
        sqlx::query("INSERT INTO shown_photos (user_id, photo_id) VALUES ($1, $2)")
            .bind(voter)
            .bind(photo)
            .execute(&self.pool)
            .await
            .expect("insert shown failed");
    }

    pub(crate) async fn set_activity(&self, user: UserId, count: i64, reset: &str) {
        sqlx::query(
            r#"
            INSERT INTO user_activity (user_id, activity_count, last_reset_date)
            VALUES ($1, $2, $3::date)
            ON CONFLICT (user_id) DO UPDATE
            SET activity_count = EXCLUDED.activity_count,
                last_reset_date = EXCLUDED.last_reset_date
            "#,
        )
        .bind(user)
        .bind(count)
        .bind(reset)
        .execute(&self.pool)
        .await
        .expect("upsert activity failed");
    }

    /// `(rating, views_count)`
    pub(crate) async fn counters(&self, photo: PhotoId) -> (i64, i64) {
        sqlx::query_as("SELECT rating, views_count FROM photos WHERE id = $1")
            .bind(photo)
            .fetch_one(&self.pool)
            .await
            .expect("select photo failed")
    }

    pub(crate) async fn activity(&self, user: UserId) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE((SELECT activity_count FROM user_activity WHERE user_id = $1), 0)",
        )
        .bind(user)
        .fetch_one(&self.pool)
        .await
        .expect("select activity failed")
    }

    pub(crate) async fn shown_count(&self, user: UserId) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM shown_photos WHERE user_id = $1")
            .bind(user)
            .fetch_one(&self.pool)
            .await
            .expect("count shown failed")
    }

    pub(crate) async fn cleanup(self) {
        self.pool
            .execute(format!("DROP SCHEMA {} CASCADE", self.schema).as_str())
            .await
            .expect("drop schema failed");
        self.pool.close().await;
    }
}
