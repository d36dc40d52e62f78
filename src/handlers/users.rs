// User handlers
// HTTP handlers for user management operations

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use super::parse_id;
use crate::{
    db::Database,
    error::ApiError,
    models::user::CreateUserRequest,
};

/// Create a new user
/// POST /user/
pub async fn create_user(
    State(db): State<Arc<Database>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    info!("Creating new user with username: {}", request.username);

    let session = db.session().await?;
    let user = session.create_user(request).await?;

    Ok((StatusCode::OK, Json(user)))
}

/// Get all users
/// GET /user/
pub async fn read_users(
    State(db): State<Arc<Database>>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching all users");

    let session = db.session().await?;
    let users = session.list_users().await?;

    info!("Retrieved {} users", users.len());
    Ok((StatusCode::OK, Json(users)))
}

/// Delete a user and return its last values
/// DELETE /user/:user_id
pub async fn delete_user(
    State(db): State<Arc<Database>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&user_id, "user")?;
    info!("Deleting user with id: {}", id);

    let session = db.session().await?;
    let user = session.delete_user(id).await?;

    Ok((StatusCode::OK, Json(user)))
}
