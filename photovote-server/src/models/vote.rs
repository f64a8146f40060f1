//! Voting request models
//!
//! Raw payloads keep every field optional so that absence is reported as a
//! validation error naming the field, not as a decoder failure.

use serde::Deserialize;

use super::validation::require;
use super::{PhotoId, UserId, ValidationError};

/// Query string of `GET /voting`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PairQuery {
    pub user_id: Option<String>,
}

impl PairQuery {
    /// Resolve the voter, rejecting absent or blank values.
    pub fn voter(&self) -> Result<UserId, ValidationError> {
        let raw = self
            .user_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ValidationError::Missing { field: "user_id" })?;
        UserId::parse(raw, "user_id")
    }
}

/// Body of `POST /voting`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoteRequest {
    pub user_id: Option<i64>,
    pub photo1_id: Option<i64>,
    pub photo2_id: Option<i64>,
    pub winner_photo_id: Option<i64>,
}

/// A vote whose four fields are present and well-formed.
///
/// `winner` is deliberately not checked against the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteSubmission {
    pub voter: UserId,
    pub photo1: PhotoId,
    pub photo2: PhotoId,
    pub winner: PhotoId,
}

impl TryFrom<VoteRequest> for VoteSubmission {
    type Error = ValidationError;

    fn try_from(req: VoteRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            voter: UserId::new(require(req.user_id, "user_id")?, "user_id")?,
            photo1: PhotoId::new(require(req.photo1_id, "photo1_id")?, "photo1_id")?,
            photo2: PhotoId::new(require(req.photo2_id, "photo2_id")?, "photo2_id")?,
            winner: PhotoId::new(
                require(req.winner_photo_id, "winner_photo_id")?,
                "winner_photo_id",
            )?,
        })
    }
}
