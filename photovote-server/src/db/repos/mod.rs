//! Repository implementations for database access
//!
//! Each repository borrows the pool and issues plain parameterized SQL.

pub mod maintenance;
pub mod photos;
pub mod stats;
pub mod voting;

pub use maintenance::{
    local_date, MaintenanceOutcome, MaintenanceReport, MaintenanceRepo, ResetOutcome,
    SnapshotOutcome,
};
pub use photos::{OwnPhoto, PhotoRepo, RankedPhoto};
pub use stats::{LeadingPhoto, Stats, StatsRepo, TopUser, UserStats};
pub use voting::PgVotingStore;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("limit reached: at most {max} {what}")]
    LimitReached { what: &'static str, max: i64 },
}

impl DbError {
    /// True when a foreign key pointed at a missing user, category or photo.
    pub fn is_unknown_reference(&self) -> bool {
        match self {
            Self::Sqlx(sqlx::Error::Database(e)) => e.is_foreign_key_violation(),
            _ => false,
        }
    }
}
