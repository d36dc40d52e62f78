// Models module

pub mod mcq;
pub mod patch;
pub mod user;

// Re-export commonly used types
pub use mcq::{CreateMcqRequest, Mcq, UpdateMcqRequest};
pub use patch::Patch;
pub use user::{CreateUserRequest, User};
