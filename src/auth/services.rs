use std::sync::Arc;

use crate::auth::error::AuthError;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::store::{StoreError, UserStore};
use crate::auth::token::TokenKeys;
use crate::auth::user::PublicUser;

// bcrypt accepts costs in this range; anything else fails at hash time.
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Authentication business logic: credential hashing, credential
/// verification and session token issuance. The store, signing keys and
/// cost factor are injected at construction; nothing is read from the
/// environment per request.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: TokenKeys,
    bcrypt_cost: u32,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("keys", &self.keys)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        keys: TokenKeys,
        bcrypt_cost: u32,
    ) -> Result<Self, AuthError> {
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            return Err(AuthError::Configuration(format!(
                "bcrypt cost {bcrypt_cost} outside {BCRYPT_COST_RANGE:?}"
            )));
        }
        Ok(Self {
            users,
            keys,
            bcrypt_cost,
        })
    }

    pub fn token_keys(&self) -> &TokenKeys {
        &self.keys
    }

    /// Register a new account. The plaintext password is hashed before it
    /// reaches the store and never appears in the returned view.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<PublicUser, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidInput);
        }
        let hash = hash_password(password, self.bcrypt_cost)
            .map_err(|e| AuthError::Configuration(e.to_string()))?;
        match self.users.create(email, &hash).await {
            Ok(user) => Ok(PublicUser::from(user)),
            Err(StoreError::DuplicateEmail) => Err(AuthError::EmailAlreadyRegistered),
            Err(e) => Err(AuthError::StoreUnavailable(e.to_string())),
        }
    }

    /// Verify credentials and mint a signed session token. Unknown email
    /// and wrong password are indistinguishable to the caller.
    pub async fn log_in(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = match self.users.find_by_email(email).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(AuthError::StoreUnavailable(e.to_string())),
        };
        // A hash that fails to parse means the stored record is unusable,
        // not that the password was wrong.
        let ok = verify_password(password, &user.password_hash)
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;
        if !ok {
            return Err(AuthError::InvalidCredentials);
        }
        self.keys.sign(user.id)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::auth::store::memory::MemoryUserStore;
    use crate::auth::user::User;

    const TEST_COST: u32 = 4;

    fn make_keys() -> TokenKeys {
        TokenKeys::new("test-secret", Duration::from_secs(12 * 60 * 60)).unwrap()
    }

    fn make_service(store: Arc<MemoryUserStore>) -> AuthService {
        AuthService::new(store, make_keys(), TEST_COST).unwrap()
    }

    #[tokio::test]
    async fn sign_up_then_log_in_returns_token() {
        let store = Arc::new(MemoryUserStore::default());
        let service = make_service(store.clone());

        let user = service
            .sign_up("a@x.com", "secret123")
            .await
            .expect("sign up");
        assert_eq!(user.email, "a@x.com");

        let token = service.log_in("a@x.com", "secret123").await.expect("log in");
        assert!(!token.is_empty());

        let claims = service.token_keys().verify(&token).expect("verify token");
        assert_eq!(claims.sub, user.id);
    }

    #[tokio::test]
    async fn stored_hash_is_not_the_plaintext() {
        let store = Arc::new(MemoryUserStore::default());
        let service = make_service(store.clone());

        service.sign_up("a@x.com", "secret123").await.expect("sign up");
        let hash = store.stored_hash("a@x.com").expect("record exists");
        assert_ne!(hash, "secret123");
        assert!(hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn public_view_never_contains_the_hash() {
        let store = Arc::new(MemoryUserStore::default());
        let service = make_service(store.clone());

        let user = service.sign_up("a@x.com", "secret123").await.expect("sign up");
        let json = serde_json::to_value(&user).expect("serialize");
        let object = json.as_object().expect("object");
        assert_eq!(object.len(), 2);
        assert!(object.contains_key("id"));
        assert!(object.contains_key("email"));
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let store = Arc::new(MemoryUserStore::default());
        let service = make_service(store.clone());

        service.sign_up("a@x.com", "secret123").await.expect("sign up");
        let err = service.log_in("a@x.com", "wrong").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn unknown_email_is_indistinguishable_from_wrong_password() {
        let store = Arc::new(MemoryUserStore::default());
        let service = make_service(store.clone());

        service.sign_up("a@x.com", "secret123").await.expect("sign up");
        let unknown = service.log_in("b@x.com", "secret123").await.unwrap_err();
        let mismatch = service.log_in("a@x.com", "wrong").await.unwrap_err();
        assert_eq!(unknown, mismatch);
    }

    #[tokio::test]
    async fn duplicate_sign_up_conflicts_and_keeps_one_record() {
        let store = Arc::new(MemoryUserStore::default());
        let service = make_service(store.clone());

        service.sign_up("a@x.com", "secret123").await.expect("first sign up");
        let err = service.sign_up("a@x.com", "other456").await.unwrap_err();
        assert_eq!(err, AuthError::EmailAlreadyRegistered);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn empty_fields_are_rejected() {
        let store = Arc::new(MemoryUserStore::default());
        let service = make_service(store.clone());

        let err = service.sign_up("", "secret123").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidInput);
        let err = service.sign_up("a@x.com", "").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidInput);
        assert_eq!(store.len(), 0);
    }

    struct FailingStore;

    #[async_trait]
    impl UserStore for FailingStore {
        async fn find_by_email(&self, _email: &str) -> Result<User, StoreError> {
            Err(StoreError::Unavailable(sqlx::Error::PoolClosed))
        }
        async fn create(&self, _email: &str, _hash: &str) -> Result<User, StoreError> {
            Err(StoreError::Unavailable(sqlx::Error::PoolClosed))
        }
    }

    #[tokio::test]
    async fn store_outage_surfaces_as_store_unavailable() {
        let service = AuthService::new(Arc::new(FailingStore), make_keys(), TEST_COST).unwrap();

        let err = service.sign_up("a@x.com", "secret123").await.unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
        let err = service.log_in("a@x.com", "secret123").await.unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
    }

    #[test]
    fn out_of_range_cost_is_a_configuration_error() {
        let store = Arc::new(MemoryUserStore::default());
        let err = AuthService::new(store, make_keys(), 50).unwrap_err();
        assert!(matches!(err, AuthError::Configuration(_)));
    }
}
