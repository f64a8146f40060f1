//! Scheduled maintenance: activity reset and daily snapshots
//!
//! "Today" is supplied by the caller so the schedule's timezone stays a
//! configuration concern.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use sqlx::PgPool;

use super::DbError;
use crate::models::MaintenanceAction;

/// Calendar date of `now` in `tz`
pub fn local_date(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResetOutcome {
    pub users_affected: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapshotOutcome {
    pub users_updated: u64,
    pub photos_updated: u64,
}

/// Result of one maintenance run, as reported to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaintenanceReport {
    pub action: MaintenanceAction,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub outcome: MaintenanceOutcome,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MaintenanceOutcome {
    Reset(ResetOutcome),
    Snapshot(SnapshotOutcome),
}

impl MaintenanceOutcome {
    /// Human-readable summary for the report
    pub fn message(&self) -> String {
        match self {
            Self::Reset(ResetOutcome { users_affected: 0 }) => {
                "No users need activity reset today".to_owned()
            }
            Self::Reset(ResetOutcome { users_affected }) => {
                format!("Activity reset for {users_affected} users")
            }
            Self::Snapshot(_) => "Daily statistics updated successfully".to_owned(),
        }
    }
}

/// Maintenance repository
pub struct MaintenanceRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> MaintenanceRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Run `action` for the calendar day `today`.
    pub async fn run(
        &self,
        action: MaintenanceAction,
        today: NaiveDate,
    ) -> Result<MaintenanceReport, DbError> {
        let outcome = match action {
            MaintenanceAction::ResetActivity => {
                MaintenanceOutcome::Reset(self.reset_activity(today).await?)
            }
            MaintenanceAction::UpdateStats => {
                MaintenanceOutcome::Snapshot(self.snapshot(today).await?)
            }
        };
        Ok(MaintenanceReport {
            action,
            date: today,
            message: outcome.message(),
            outcome,
        })
    }

    /// Zero every counter last reset before `today`.
    ///
    /// Rows already reset today are untouched, so repeated runs are no-ops.
    pub async fn reset_activity(&self, today: NaiveDate) -> Result<ResetOutcome, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE user_activity
            SET activity_count = 0, last_reset_date = $1
            WHERE last_reset_date < $1
            "#,
        )
        .bind(today)
        .execute(self.pool)
        .await?;

        let users_affected = result.rows_affected();
        tracing::info!(%today, users_affected, "activity reset");
        Ok(ResetOutcome { users_affected })
    }

    /// Upsert today's activity and rating snapshot for every user and photo.
    pub async fn snapshot(&self, today: NaiveDate) -> Result<SnapshotOutcome, DbError> {
        let mut tx = self.pool.begin().await?;

        let users = sqlx::query(
            r#"
            INSERT INTO daily_stats (snapshot_date, user_id, activity_count)
            SELECT $1, u.id, COALESCE(ua.activity_count, 0)
            FROM users u
            LEFT JOIN user_activity ua ON u.id = ua.user_id
            ON CONFLICT (snapshot_date, user_id, (COALESCE(photo_id, 0)))
            DO UPDATE SET activity_count = EXCLUDED.activity_count
            "#,
        )
        .bind(today)
        .execute(&mut *tx)
        .await?;

        let photos = sqlx::query(
            r#"
            INSERT INTO daily_stats (snapshot_date, user_id, photo_id, photo_rating)
            SELECT $1, p.user_id, p.id, p.rating
            FROM photos p
            ON CONFLICT (snapshot_date, user_id, (COALESCE(photo_id, 0)))
            DO UPDATE SET photo_rating = EXCLUDED.photo_rating
            "#,
        )
        .bind(today)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let outcome = SnapshotOutcome {
            users_updated: users.rows_affected(),
            photos_updated: photos.rows_affected(),
        };
        tracing::info!(
            %today,
            users = outcome.users_updated,
            photos = outcome.photos_updated,
            "daily stats snapshot written"
        );
        Ok(outcome)
    }
}
