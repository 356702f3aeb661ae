use thiserror::Error;

/// Failures surfaced by the authentication service to its callers.
///
/// Unknown email and wrong password are deliberately collapsed into
/// [`AuthError::InvalidCredentials`] so a caller cannot probe which
/// addresses have accounts.
#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("email and password must be provided")]
    InvalidInput,

    #[error("email already registered")]
    EmailAlreadyRegistered,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("invalid authentication configuration: {0}")]
    Configuration(String),
}
