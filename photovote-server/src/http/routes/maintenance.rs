//! Maintenance trigger endpoint

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;

use super::endpoint;
use crate::db::repos::{local_date, MaintenanceReport, MaintenanceRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ApiQuery;
use crate::http::server::AppState;
use crate::models::MaintenanceQuery;

/// POST /maintenance?action= - run a daily job for today's local date
async fn run_maintenance(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<MaintenanceQuery>,
) -> Result<Json<MaintenanceReport>, ApiError> {
    let action = query.action()?;
    let today = local_date(state.timezone, Utc::now());
    let report = MaintenanceRepo::new(&state.pool).run(action, today).await?;
    Ok(Json(report))
}

/// Maintenance routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/maintenance",
        endpoint(post(run_maintenance), "POST, OPTIONS"),
    )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::db::test_support::Fixture;
    use crate::http::routes::test_support::{harness, harness_with_pool};
    use crate::voting::memory::MemoryVotingStore;

    #[tokio::test]
    async fn unknown_action_is_400() {
        let h = harness(MemoryVotingStore::new());
        let reply = h.request("POST", "/maintenance?action=drop_everything").await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            reply.json()["message"],
            "invalid action value: 'drop_everything'"
        );
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn defaults_to_update_stats() {
        let fx = Fixture::new().await;
        fx.user("alice").await;
        let h = harness_with_pool(fx.pool().clone());

        let body = h.request("POST", "/maintenance").await.json();
        assert_eq!(body["action"], "update_stats");
        assert_eq!(body["users_updated"], 1);
        assert_eq!(body["photos_updated"], 0);
        assert_eq!(body["message"], "Daily statistics updated successfully");

        let reset = h
            .request("POST", "/maintenance?action=reset_activity")
            .await
            .json();
        assert_eq!(reset["action"], "reset_activity");
        assert_eq!(reset["users_affected"], 0);
        assert_eq!(reset["message"], "No users need activity reset today");

        fx.cleanup().await;
    }
}
