use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::auth::user::User;

/// Failures of the credential store itself, before the service maps them
/// onto its caller-facing taxonomy.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no account matches that email")]
    NotFound,

    #[error("email already exists")]
    DuplicateEmail,

    #[error("persistence failure: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// Persistence contract the authentication service depends on. Any backend
/// satisfying it works, including the in-memory store used in tests.
///
/// Email uniqueness under concurrent `create` calls is the store's
/// responsibility; exactly one of two racing calls for the same email may
/// succeed.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<User, StoreError>;
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;
}

/// Postgres-backed credential store. The unique index on `users.email`
/// supplies the concurrent-create guarantee.
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        user.ok_or(StoreError::NotFound)
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                StoreError::DuplicateEmail
            } else {
                StoreError::Unavailable(e)
            }
        })
    }
}
