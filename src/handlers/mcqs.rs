// Mcq handlers
// HTTP handlers for multiple-choice question operations

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
    models::mcq::{CreateMcqRequest, UpdateMcqRequest},
};

/// Create a new mcq
/// POST /mcqs/
pub async fn create_mcq(
    State(db): State<Arc<Database>>,
    payload: Result<Json<CreateMcqRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    request.validate().map_err(ApiError::Validation)?;
    info!("Creating new mcq for subject: {} chapter: {}", request.subject, request.chapter);

    let session = db.session().await?;
    let mcq = session.create_mcq(request).await?;

    Ok((StatusCode::OK, Json(mcq)))
}

/// List mcqs for a subject across all chapters
/// GET /mcqs/:subject
pub async fn read_mcqs_by_subject(
    State(db): State<Arc<Database>>,
    Path(subject): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching mcqs for subject: {}", subject);

    let session = db.session().await?;
    let mcqs = session.mcqs_by_subject(&subject).await?;

    info!("Retrieved {} mcqs for subject: {}", mcqs.len(), subject);
    Ok((StatusCode::OK, Json(mcqs)))
}

/// List mcqs for one chapter of a subject
/// GET /mcqs/:subject/:chapter
pub async fn read_mcqs_by_subject_and_chapter(
    State(db): State<Arc<Database>>,
    Path((subject, chapter)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching mcqs for subject: {} chapter: {}", subject, chapter);

    let session = db.session().await?;
    let mcqs = session.mcqs_by_subject_and_chapter(&subject, &chapter).await?;

    info!("Retrieved {} mcqs for subject: {} chapter: {}", mcqs.len(), subject, chapter);
    Ok((StatusCode::OK, Json(mcqs)))
}

/// Merge-patch an mcq: only the fields present in the body are changed
/// PATCH /mcqs/:mcq_id
pub async fn update_mcq(
    State(db): State<Arc<Database>>,
    Path(mcq_id): Path<String>,
    payload: Result<Json<UpdateMcqRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&mcq_id, "mcq")?;
    let Json(request) = payload?;
    request.validate().map_err(ApiError::Validation)?;
    info!("Updating mcq with id: {}", id);

    let session = db.session().await?;
    let mcq = session.update_mcq(id, request).await?;

    Ok((StatusCode::OK, Json(mcq)))
}

/// Delete an mcq and return its last values
/// DELETE /mcqs/:mcq_id
pub async fn delete_mcq(
    State(db): State<Arc<Database>>,
    Path(mcq_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&mcq_id, "mcq")?;
    info!("Deleting mcq with id: {}", id);

    let session = db.session().await?;
    let mcq = session.delete_mcq(id).await?;

    Ok((StatusCode::OK, Json(mcq)))
}
