//! Storage seam for the voting workflow
//!
//! The selector only reads; the recorder drives one [`VoteTransaction`]
//! per vote. Dropping a transaction without committing discards its writes.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::db::DbError;
use crate::models::{CategoryId, PhotoId, UserId, VoteSubmission};

/// Category row as the selector sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub display_order: i32,
}

/// Photo fields exposed in a voting pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct PairPhoto {
    pub id: PhotoId,
    pub rating: i64,
    pub views_count: i64,
}

/// Read side plus transaction factory
#[async_trait]
pub trait VotingStore: Send + Sync {
    /// All categories, ascending by display order.
    async fn categories(&self) -> Result<Vec<Category>, DbError>;

    /// Photos in `category` not owned by and not yet shown to `voter`,
    /// least viewed first with random tie-break, at most `limit`.
    async fn unseen_candidates(
        &self,
        category: CategoryId,
        voter: UserId,
        limit: i64,
    ) -> Result<Vec<PairPhoto>, DbError>;

    /// Open a write transaction.
    async fn begin(&self) -> Result<Box<dyn VoteTransaction>, DbError>;
}

/// Write steps of a single vote, applied inside one transaction
#[async_trait]
pub trait VoteTransaction: Send {
    async fn insert_vote(&mut self, vote: &VoteSubmission) -> Result<(), DbError>;

    async fn increment_rating(&mut self, photo: PhotoId) -> Result<(), DbError>;

    /// Record both photos as shown; existing rows are left untouched.
    async fn mark_shown(&mut self, voter: UserId, photos: [PhotoId; 2]) -> Result<(), DbError>;

    async fn increment_views(&mut self, photos: [PhotoId; 2]) -> Result<(), DbError>;

    /// Bump the voter's activity counter, creating the row if absent.
    ///
    /// A new row counts as already reset on `today`, the caller's local date.
    async fn increment_activity(&mut self, voter: UserId, today: NaiveDate) -> Result<(), DbError>;

    async fn commit(self: Box<Self>) -> Result<(), DbError>;

    async fn rollback(self: Box<Self>) -> Result<(), DbError>;
}
