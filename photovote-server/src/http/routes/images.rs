//! Batch image URL lookup

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use super::endpoint;
use crate::db::repos::PhotoRepo;
use crate::http::error::ApiError;
use crate::http::extractors::ApiQuery;
use crate::http::server::AppState;
use crate::models::ImageBatchQuery;

/// GET /images?photo_ids=1,2,3 - `{"<id>": image_url}` for ids that exist
async fn image_urls(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ImageBatchQuery>,
) -> Result<Json<BTreeMap<String, String>>, ApiError> {
    let ids = query.ids()?;
    if ids.is_empty() {
        return Ok(Json(BTreeMap::new()));
    }

    let urls = PhotoRepo::new(&state.pool).image_urls(&ids).await?;
    Ok(Json(
        urls.into_iter()
            .map(|(id, url)| (id.to_string(), url))
            .collect(),
    ))
}

/// Image lookup routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/images", endpoint(get(image_urls), "GET, OPTIONS"))
}
