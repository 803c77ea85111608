use thiserror::Error;

/// Error type for token operations.
///
/// Validation failures collapse into `InvalidToken` on purpose; only expiry
/// is reported separately.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("invalid token")]
    InvalidToken,

    #[error("token has expired")]
    ExpiredToken,

    #[error("failed to sign token: {0}")]
    SigningFailed(String),
}
