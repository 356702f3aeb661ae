use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::auth::services::AuthService;
use crate::auth::store::PgUserStore;
use crate::auth::token::TokenKeys;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Load configuration and wire the service graph. A missing or empty
    /// signing secret and an out-of-range bcrypt cost both fail here, so
    /// the process refuses to serve rather than failing per request.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Self::from_parts(db, config)
    }

    pub fn from_parts(db: PgPool, config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let keys = TokenKeys::new(
            &config.auth.jwt_secret,
            Duration::from_secs(config.auth.token_ttl_hours.unsigned_abs() * 60 * 60),
        )?;
        let users = Arc::new(PgUserStore::new(db.clone()));
        let auth = Arc::new(AuthService::new(users, keys, config.auth.bcrypt_cost)?);
        Ok(Self { db, config, auth })
    }
}
