use auth::AuthenticationError;
use auth::JwtError;
use thiserror::Error;

use crate::user::errors::UserError;

/// Errors of the login, registration and current-user use cases.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password; deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already registered: {0}")]
    Conflict(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailAlreadyExists(email) => AuthError::Conflict(email),
            UserError::NotFound(id) => AuthError::UserNotFound(id),
            other => AuthError::Internal(other.to_string()),
        }
    }
}

impl From<AuthenticationError> for AuthError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
            AuthenticationError::PasswordError(e) => AuthError::Internal(e.to_string()),
            AuthenticationError::JwtError(e) => AuthError::Internal(e.to_string()),
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<auth::PasswordError> for AuthError {
    fn from(err: auth::PasswordError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
