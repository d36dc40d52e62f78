use serde::{Deserialize, Serialize};

/// A registered user. Usernames are indexed but not unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
}

/// Body of `POST /user/`. Any `id` supplied by the caller is ignored, and
/// any string, including `""`, is a valid username.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
}
