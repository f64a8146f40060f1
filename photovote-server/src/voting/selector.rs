//! Pair selection
//!
//! Categories are scanned in display order; the first one holding two
//! photos the voter has neither authored nor seen supplies the pair.

use crate::db::DbError;
use crate::models::UserId;

use super::store::{Category, PairPhoto, VotingStore};

/// Photos per voting pair
const PAIR_SIZE: i64 = 2;

/// Outcome of a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairResult {
    Pair {
        category: Category,
        photo1: PairPhoto,
        photo2: PairPhoto,
    },
    /// Nothing left to show this voter in any category
    Completed,
}

/// Read-only pair selector
pub struct PairSelector<'a> {
    store: &'a dyn VotingStore,
}

impl<'a> PairSelector<'a> {
    pub fn new(store: &'a dyn VotingStore) -> Self {
        Self { store }
    }

    /// Pick the next pair for `voter`.
    pub async fn select(&self, voter: UserId) -> Result<PairResult, DbError> {
        let categories = self.store.categories().await?;

        for category in categories {
            let candidates = self
                .store
                .unseen_candidates(category.id, voter, PAIR_SIZE)
                .await?;

            let mut candidates = candidates.into_iter();
            if let (Some(photo1), Some(photo2)) = (candidates.next(), candidates.next()) {
                tracing::debug!(
                    voter = %voter,
                    category = %category.name,
                    photo1 = %photo1.id,
                    photo2 = %photo2.id,
                    "pair selected"
                );
                return Ok(PairResult::Pair {
                    category,
                    photo1,
                    photo2,
                });
            }
        }

        tracing::debug!(voter = %voter, "no unseen pairs left");
        Ok(PairResult::Completed)
    }
}
