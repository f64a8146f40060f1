//! Image upload endpoint

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use super::endpoint;
use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;
use crate::models::ImageUploadRequest;
use crate::storage::photo_key;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// POST /upload-image - store a base64 image, return its public URL
async fn upload_image(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ImageUploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    let bytes = req.decode()?;
    let size = bytes.len();
    let key = photo_key();
    let url = state.blobs.put(&key, bytes, "image/jpeg").await?;

    tracing::info!(%key, size, "image uploaded");
    Ok(Json(UploadResponse { url }))
}

/// Upload routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/upload-image", endpoint(post(upload_image), "POST, OPTIONS"))
}
