//! Voting endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use super::{endpoint, MessageResponse};
use crate::db::repos::local_date;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiQuery};
use crate::http::server::AppState;
use crate::models::{PairQuery, VoteRequest, VoteSubmission};
use crate::voting::{PairPhoto, PairResult, PairSelector, VoteRecorder};

/// Next pair for a voter, or the completion marker
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PairResponse {
    Pair {
        photo1: PairPhoto,
        photo2: PairPhoto,
        category: String,
    },
    Completed {
        completed: bool,
        message: &'static str,
    },
}

impl From<PairResult> for PairResponse {
    fn from(result: PairResult) -> Self {
        match result {
            PairResult::Pair {
                category,
                photo1,
                photo2,
            } => Self::Pair {
                photo1,
                photo2,
                category: category.name,
            },
            PairResult::Completed => Self::Completed {
                completed: true,
                message: "All photos voted",
            },
        }
    }
}

/// GET /voting?user_id= - next pair to vote on
async fn next_pair(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PairQuery>,
) -> Result<Json<PairResponse>, ApiError> {
    let voter = query.voter()?;
    let result = PairSelector::new(state.voting.as_ref()).select(voter).await?;
    Ok(Json(PairResponse::from(result)))
}

/// POST /voting - record one vote
async fn submit_vote(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<VoteRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let vote = VoteSubmission::try_from(req)?;
    let today = local_date(state.timezone, Utc::now());
    VoteRecorder::new(state.voting.as_ref())
        .record(&vote, today)
        .await?;

    Ok(Json(MessageResponse {
        message: "Vote recorded successfully",
    }))
}

/// Voting routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/voting",
        endpoint(get(next_pair).post(submit_vote), "GET, POST, OPTIONS"),
    )
}
