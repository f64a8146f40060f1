//! Photo endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use super::endpoint;
use crate::db::repos::{OwnPhoto, PhotoRepo, RankedPhoto};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiQuery};
use crate::http::server::AppState;
use crate::models::{NewPhoto, NewPhotoRequest, PhotoId, UserQuery};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PhotoListResponse {
    Own(Vec<OwnPhoto>),
    Ranked(Vec<RankedPhoto>),
}

#[derive(Debug, Serialize)]
pub struct CreatePhotoResponse {
    pub photo_id: PhotoId,
    pub message: &'static str,
}

/// GET /photos[?user_id=] - a user's photos, or the overall top list
async fn list_photos(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<PhotoListResponse>, ApiError> {
    let repo = PhotoRepo::new(&state.pool);
    let photos = match query.user()? {
        Some(owner) => PhotoListResponse::Own(repo.list_for_owner(owner).await?),
        None => PhotoListResponse::Ranked(repo.top_rated().await?),
    };
    Ok(Json(photos))
}

/// POST /photos - enter a photo into a category
async fn create_photo(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<NewPhotoRequest>,
) -> Result<Json<CreatePhotoResponse>, ApiError> {
    let photo = NewPhoto::try_from(req)?;
    let photo_id = PhotoRepo::new(&state.pool).create(&photo).await?;

    tracing::info!(%photo_id, owner = %photo.owner, category = %photo.category, "photo created");
    Ok(Json(CreatePhotoResponse {
        photo_id,
        message: "Photo uploaded successfully",
    }))
}

/// Photo routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/photos",
        endpoint(get(list_photos).post(create_photo), "GET, POST, OPTIONS"),
    )
}
