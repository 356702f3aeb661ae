use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for sign-up.
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LogInRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Identity of the caller behind a valid bearer token.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: Uuid,
}
