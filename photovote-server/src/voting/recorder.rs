//! Vote recording
//!
//! All five effects of a vote land in one transaction. A failure at any
//! step rolls back everything written so far.

use chrono::NaiveDate;

use crate::db::DbError;
use crate::models::VoteSubmission;

use super::store::{VoteTransaction, VotingStore};

/// Transactional vote writer
pub struct VoteRecorder<'a> {
    store: &'a dyn VotingStore,
}

impl<'a> VoteRecorder<'a> {
    pub fn new(store: &'a dyn VotingStore) -> Self {
        Self { store }
    }

    /// Persist `vote` and its counter updates, all or nothing.
    ///
    /// `today` is the local calendar date the activity counter belongs to.
    pub async fn record(&self, vote: &VoteSubmission, today: NaiveDate) -> Result<(), DbError> {
        let mut tx = self.store.begin().await?;

        if let Err(err) = apply(tx.as_mut(), vote, today).await {
            tracing::warn!(voter = %vote.voter, error = %err, "vote failed, rolling back");
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "rollback failed");
            }
            return Err(err);
        }

        tx.commit().await?;
        tracing::info!(
            voter = %vote.voter,
            photo1 = %vote.photo1,
            photo2 = %vote.photo2,
            winner = %vote.winner,
            "vote recorded"
        );
        Ok(())
    }
}

async fn apply(
    tx: &mut dyn VoteTransaction,
    vote: &VoteSubmission,
    today: NaiveDate,
) -> Result<(), DbError> {
    let pair = [vote.photo1, vote.photo2];
    tx.insert_vote(vote).await?;
    tx.increment_rating(vote.winner).await?;
    tx.mark_shown(vote.voter, pair).await?;
    tx.increment_views(pair).await?;
    tx.increment_activity(vote.voter, today).await?;
    Ok(())
}
