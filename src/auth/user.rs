use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record as persisted by the credential store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                   // assigned by the store, immutable
    pub email: String,              // unique login key
    #[serde(skip_serializing)]
    pub password_hash: String,      // bcrypt hash, never exposed in JSON
    pub created_at: OffsetDateTime, // creation timestamp
}

/// Public part of the user returned to clients. Built field by field so
/// the password hash can never leak through serialization.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}
