//! Voting workflow: pick an unseen pair, record the verdict.
//!
//! Both halves talk to storage only through [`VotingStore`]; the Postgres
//! implementation lives in `db::repos::voting`.

#[cfg(test)]
pub(crate) mod memory;
pub mod recorder;
pub mod selector;
pub mod store;

pub use recorder::VoteRecorder;
pub use selector::{PairResult, PairSelector};
pub use store::{Category, PairPhoto, VoteTransaction, VotingStore};
