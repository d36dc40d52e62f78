// Library root for the Quizzer API

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;

// Re-export commonly used types
pub use db::{Database, Session};
pub use error::{ApiError, ApiResult};
pub use models::{CreateMcqRequest, CreateUserRequest, Mcq, UpdateMcqRequest, User};
pub use router::create_router;
