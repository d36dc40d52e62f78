use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{
    db::Database,
    handlers::{
        mcqs::{create_mcq, delete_mcq, read_mcqs_by_subject, read_mcqs_by_subject_and_chapter, update_mcq},
        privacy_policy, read_root,
        users::{create_user, delete_user, read_users},
    },
    middleware::create_middleware_stack,
};

/// Create the Axum router with all endpoints and middleware
///
/// `/mcqs/:key` is a subject for GET and an mcq id for PATCH and DELETE.
/// The router requires one parameter name per path segment, so the three
/// methods share the pattern and each handler reads the segment its own way.
///
/// The collection routes answer with and without the trailing slash.
pub fn create_router(database: Arc<Database>) -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/privacy", get(privacy_policy))
        // Mcq endpoints
        .route("/mcqs/", post(create_mcq))
        .route("/mcqs", post(create_mcq))
        .route(
            "/mcqs/:key",
            get(read_mcqs_by_subject).patch(update_mcq).delete(delete_mcq),
        )
        .route("/mcqs/:key/:chapter", get(read_mcqs_by_subject_and_chapter))
        // User endpoints
        .route("/user/", post(create_user).get(read_users))
        .route("/user", post(create_user).get(read_users))
        .route("/user/:user_id", delete(delete_user))
        .with_state(database)
        .layer(create_middleware_stack())
}
