//! In-memory store for exercising the voting workflow without Postgres
//!
//! A transaction works on a private copy of the state and publishes it on
//! commit. Faults can be injected at any write step.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use rand::seq::SliceRandom;

use crate::db::DbError;
use crate::models::{CategoryId, PhotoId, UserId, VoteSubmission};

use super::store::{Category, PairPhoto, VoteTransaction, VotingStore};

/// Step at which an injected fault fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    InsertVote,
    IncrementRating,
    MarkShown,
    IncrementViews,
    IncrementActivity,
    Commit,
}

#[derive(Debug, Clone)]
struct MemoryPhoto {
    id: PhotoId,
    owner: UserId,
    category: CategoryId,
    rating: i64,
    views_count: i64,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    categories: Vec<Category>,
    photos: Vec<MemoryPhoto>,
    votes: Vec<VoteSubmission>,
    shown: BTreeSet<(UserId, PhotoId)>,
    activity: HashMap<UserId, i64>,
}

impl MemoryState {
    fn photo_mut(&mut self, id: PhotoId) -> Option<&mut MemoryPhoto> {
        self.photos.iter_mut().find(|p| p.id == id)
    }
}

#[derive(Debug, Default)]
struct Faults {
    unavailable: bool,
    fail_at: Option<FailPoint>,
}

/// Shared in-memory voting store
#[derive(Clone, Default)]
pub struct MemoryVotingStore {
    state: Arc<Mutex<MemoryState>>,
    faults: Arc<Mutex<Faults>>,
}

fn unavailable() -> DbError {
    DbError::Sqlx(sqlx::Error::PoolTimedOut)
}

fn user(id: i64) -> UserId {
    UserId::new(id, "user_id").expect("fixture user id")
}

fn photo(id: i64) -> PhotoId {
    PhotoId::new(id, "photo_id").expect("fixture photo id")
}

impl MemoryVotingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_category(&self, id: i64, name: &str, display_order: i32) {
        self.state.lock().unwrap().categories.push(Category {
            id: CategoryId::new(id, "category_id").expect("fixture category id"),
            name: name.to_owned(),
            display_order,
        });
    }

    pub fn add_photo(&self, id: i64, owner: i64, category: i64) {
        self.add_photo_with_views(id, owner, category, 0);
    }

    pub fn add_photo_with_views(&self, id: i64, owner: i64, category: i64, views_count: i64) {
        self.state.lock().unwrap().photos.push(MemoryPhoto {
            id: photo(id),
            owner: user(owner),
            category: CategoryId::new(category, "category_id").expect("fixture category id"),
            rating: 0,
            views_count,
        });
    }

    pub fn mark_seen(&self, voter: i64, photo_id: i64) {
        self.state
            .lock()
            .unwrap()
            .shown
            .insert((user(voter), photo(photo_id)));
    }

    /// Make every call fail as if the pool could not hand out a connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.faults.lock().unwrap().unavailable = unavailable;
    }

    pub fn fail_at(&self, point: FailPoint) {
        self.faults.lock().unwrap().fail_at = Some(point);
    }

    pub fn clear_failure(&self) {
        self.faults.lock().unwrap().fail_at = None;
    }

    /// `(rating, views_count)` of a photo
    pub fn photo_counters(&self, id: i64) -> (i64, i64) {
        let state = self.state.lock().unwrap();
        state
            .photos
            .iter()
            .find(|p| p.id == photo(id))
            .map(|p| (p.rating, p.views_count))
            .expect("unknown photo")
    }

    pub fn activity(&self, voter: i64) -> i64 {
        let state = self.state.lock().unwrap();
        state.activity.get(&user(voter)).copied().unwrap_or(0)
    }

    pub fn was_shown(&self, voter: i64, photo_id: i64) -> bool {
        let state = self.state.lock().unwrap();
        state.shown.contains(&(user(voter), photo(photo_id)))
    }

    pub fn shown_count(&self, voter: i64) -> usize {
        let voter = user(voter);
        let state = self.state.lock().unwrap();
        state.shown.iter().filter(|(v, _)| *v == voter).count()
    }

    pub fn vote_count(&self) -> usize {
        self.state.lock().unwrap().votes.len()
    }

    fn check_available(&self) -> Result<(), DbError> {
        if self.faults.lock().unwrap().unavailable {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl VotingStore for MemoryVotingStore {
    async fn categories(&self) -> Result<Vec<Category>, DbError> {
        self.check_available()?;
        let mut categories = self.state.lock().unwrap().categories.clone();
        categories.sort_by_key(|c| (c.display_order, c.id));
        Ok(categories)
    }

    async fn unseen_candidates(
        &self,
        category: CategoryId,
        voter: UserId,
        limit: i64,
    ) -> Result<Vec<PairPhoto>, DbError> {
        self.check_available()?;
        let state = self.state.lock().unwrap();
        let mut candidates: Vec<PairPhoto> = state
            .photos
            .iter()
            .filter(|p| p.category == category && p.owner != voter)
            .filter(|p| !state.shown.contains(&(voter, p.id)))
            .map(|p| PairPhoto {
                id: p.id,
                rating: p.rating,
                views_count: p.views_count,
            })
            .collect();

        // shuffle then stable sort: random order among equal view counts
        candidates.shuffle(&mut rand::thread_rng());
        candidates.sort_by_key(|p| p.views_count);
        candidates.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(candidates)
    }

    async fn begin(&self) -> Result<Box<dyn VoteTransaction>, DbError> {
        self.check_available()?;
        let staged = self.state.lock().unwrap().clone();
        Ok(Box::new(MemoryTransaction {
            store: self.clone(),
            staged,
        }))
    }
}

struct MemoryTransaction {
    store: MemoryVotingStore,
    staged: MemoryState,
}

impl MemoryTransaction {
    fn step(&self, point: FailPoint) -> Result<(), DbError> {
        if self.store.faults.lock().unwrap().fail_at == Some(point) {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl VoteTransaction for MemoryTransaction {
    async fn insert_vote(&mut self, vote: &VoteSubmission) -> Result<(), DbError> {
        self.step(FailPoint::InsertVote)?;
        self.staged.votes.push(*vote);
        Ok(())
    }

    async fn increment_rating(&mut self, photo: PhotoId) -> Result<(), DbError> {
        self.step(FailPoint::IncrementRating)?;
        if let Some(p) = self.staged.photo_mut(photo) {
            p.rating += 1;
        }
        Ok(())
    }

    async fn mark_shown(&mut self, voter: UserId, photos: [PhotoId; 2]) -> Result<(), DbError> {
        self.step(FailPoint::MarkShown)?;
        for photo in photos {
            self.staged.shown.insert((voter, photo));
        }
        Ok(())
    }

    async fn increment_views(&mut self, photos: [PhotoId; 2]) -> Result<(), DbError> {
        self.step(FailPoint::IncrementViews)?;
        let distinct: BTreeSet<PhotoId> = photos.into_iter().collect();
        for photo in distinct {
            if let Some(p) = self.staged.photo_mut(photo) {
                p.views_count += 1;
            }
        }
        Ok(())
    }

    async fn increment_activity(
        &mut self,
        voter: UserId,
        _today: NaiveDate,
    ) -> Result<(), DbError> {
        self.step(FailPoint::IncrementActivity)?;
        *self.staged.activity.entry(voter).or_insert(0) += 1;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DbError> {
        self.step(FailPoint::Commit)?;
        *self.store.state.lock().unwrap() = self.staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DbError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shown_insert_is_idempotent() {
        let store = MemoryVotingStore::new();
        store.add_photo(10, 2, 1);
        store.add_photo(11, 2, 1);
        let voter = user(1);

        let mut tx = store.begin().await.unwrap();
        tx.mark_shown(voter, [photo(10), photo(11)]).await.unwrap();
        tx.mark_shown(voter, [photo(10), photo(11)]).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(store.shown_count(1), 2);
    }

    #[tokio::test]
    async fn uncommitted_transaction_is_discarded() {
        let store = MemoryVotingStore::new();
        store.add_photo(10, 2, 1);

        let mut tx = store.begin().await.unwrap();
        tx.increment_rating(photo(10)).await.unwrap();
        drop(tx);

        assert_eq!(store.photo_counters(10), (0, 0));
    }
}
