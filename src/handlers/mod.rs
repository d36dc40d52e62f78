// Handlers module
// HTTP handlers for the REST API

pub mod mcqs;
pub mod users;

use axum::{response::IntoResponse, Json};
use serde_json::json;

use crate::error::ApiError;

/// GET /
pub async fn read_root() -> impl IntoResponse {
    Json(json!({ "message": "Quizzer" }))
}

/// GET /privacy
pub async fn privacy_policy() -> impl IntoResponse {
    Json(json!({ "This month Fools!!!!": "May" }))
}

/// Parses a numeric record id taken from the path.
pub(crate) fn parse_id(raw: &str, resource: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::validation(format!("Invalid {} id: {}", resource, raw)))
}
