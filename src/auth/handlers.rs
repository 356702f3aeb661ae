use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LogInRequest, MeResponse, SignUpRequest, TokenResponse},
        error::AuthError,
        extractors::AuthUser,
        user::PublicUser,
    },
    state::AppState,
};

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/login", post(log_in))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

/// Map a service error onto a protocol status. Credential failures stay
/// generic and internal failures leak no detail to the client.
fn reject(err: AuthError) -> (StatusCode, String) {
    match &err {
        AuthError::InvalidInput => (StatusCode::BAD_REQUEST, err.to_string()),
        AuthError::EmailAlreadyRegistered => (StatusCode::CONFLICT, err.to_string()),
        AuthError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
        }
        AuthError::StoreUnavailable(detail) => {
            error!(error = %detail, "credential store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
        AuthError::Configuration(detail) => {
            error!(error = %detail, "authentication configuration failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(mut payload): Json<SignUpRequest>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err((StatusCode::BAD_REQUEST, "Password too short".into()));
    }

    match state.auth.sign_up(&payload.email, &payload.password).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "user registered");
            Ok(Json(user))
        }
        Err(e) => {
            if e == AuthError::EmailAlreadyRegistered {
                warn!(email = %payload.email, "email already registered");
            }
            Err(reject(e))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn log_in(
    State(state): State<AppState>,
    Json(mut payload): Json<LogInRequest>,
) -> Result<Json<TokenResponse>, (StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    match state.auth.log_in(&payload.email, &payload.password).await {
        Ok(token) => {
            info!(email = %payload.email, "user logged in");
            Ok(Json(TokenResponse { token }))
        }
        Err(e) => {
            if e == AuthError::InvalidCredentials {
                warn!(email = %payload.email, "login rejected");
            }
            Err(reject(e))
        }
    }
}

#[instrument]
pub async fn get_me(AuthUser(user_id): AuthUser) -> Json<MeResponse> {
    Json(MeResponse { user_id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_mapping_follows_the_taxonomy() {
        assert_eq!(reject(AuthError::InvalidInput).0, StatusCode::BAD_REQUEST);
        assert_eq!(
            reject(AuthError::EmailAlreadyRegistered).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            reject(AuthError::InvalidCredentials).0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            reject(AuthError::StoreUnavailable("pool closed".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            reject(AuthError::Configuration("empty secret".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_is_not_leaked() {
        let (_, body) = reject(AuthError::StoreUnavailable("connection refused".into()));
        assert!(!body.contains("connection refused"));
        let (_, body) = reject(AuthError::Configuration("secret".into()));
        assert!(!body.contains("secret"));
    }

    #[test]
    fn credential_failure_message_is_generic() {
        let (_, body) = reject(AuthError::InvalidCredentials);
        assert_eq!(body, "Invalid credentials");
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@x.com"));
    }

    #[test]
    fn public_user_serializes_id_and_email_only() {
        let user = PublicUser {
            id: uuid::Uuid::new_v4(),
            email: "test@example.com".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("id"));
        assert!(!json.contains("password"));
    }
}
