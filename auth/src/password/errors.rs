use thiserror::Error;

/// Error type for password hashing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    #[error("stored password hash is unusable: {0}")]
    VerificationFailed(String),
}
