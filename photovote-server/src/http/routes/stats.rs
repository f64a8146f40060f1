//! Leaderboard endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use super::endpoint;
use crate::db::repos::{Stats, StatsRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ApiQuery;
use crate::http::server::AppState;
use crate::models::UserQuery;

/// GET /stats[?user_id=] - leaderboards plus the caller's own numbers
async fn stats(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<Stats>, ApiError> {
    let user = query.user()?;
    let stats = StatsRepo::new(&state.pool).collect(user).await?;
    Ok(Json(stats))
}

/// Stats routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stats", endpoint(get(stats), "GET, OPTIONS"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::db::test_support::Fixture;
    use crate::http::routes::test_support::{harness, harness_with_pool};
    use crate::voting::memory::MemoryVotingStore;

    #[tokio::test]
    async fn bad_user_is_400() {
        let h = harness(MemoryVotingStore::new());
        let reply = h.get("/stats?user_id=abc").await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn anonymous_stats() {
        let fx = Fixture::new().await;
        let alice = fx.user("alice").await;
        let nature = fx.category("Nature", 1).await;
        fx.rated_photo(alice, nature, 3).await;
        let h = harness_with_pool(fx.pool().clone());

        let body = h.get("/stats").await.json();
        assert_eq!(body["top_users"][0]["username"], "alice");
        assert_eq!(body["top_photo"]["rating"], 3);
        assert_eq!(body["top_photos_by_category"][0]["category_name"], "Nature");
        assert_eq!(body["user_stats"]["rank"], serde_json::Value::Null);
        assert_eq!(body["user_stats"]["activity"], 0);

        fx.cleanup().await;
    }
}
