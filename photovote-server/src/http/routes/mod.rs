//! Route handlers organized by resource
//!
//! Every endpoint answers `OPTIONS` with an empty preflight response and
//! any method it does not serve with a JSON 405.

pub mod health;
pub mod images;
pub mod maintenance;
pub mod photos;
pub mod stats;
pub mod upload;
pub mod voting;

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE,
};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::MethodRouter;
use serde::Serialize;

use super::error::ApiError;

/// Plain acknowledgement body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Attach the preflight handler and the 405 fallback to `methods`.
///
/// `allow` lists the served methods, `OPTIONS` included.
pub fn endpoint<S>(methods: MethodRouter<S>, allow: &'static str) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    methods
        .options(move || async move { preflight(allow) })
        .fallback(method_not_allowed)
}

fn preflight(allow: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
            (ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(allow)),
            (
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type, X-User-Id"),
            ),
            (ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400")),
        ],
    )
        .into_response()
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
