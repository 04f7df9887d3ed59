use serde::{Deserialize, Serialize};

use crate::session::types::{Role, UserProfile};

#[derive(Debug, Serialize)]
pub struct UserCreate {
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub password: String,
}

/// A taken email is answered with `200 {"error": ...}` instead of a status.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CreateUserResponse {
    Rejected { error: String },
    Created(UserProfile),
}

#[derive(Debug, Serialize)]
pub struct ActiveUpdate {
    pub is_active: bool,
}
