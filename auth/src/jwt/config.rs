use std::fmt;

use chrono::Duration;

/// Immutable token signing configuration.
///
/// Built once at startup and handed to the [`TokenService`](super::TokenService).
/// The secret never leaves this value except to derive signing keys.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    lifetime: Duration,
    issuer: String,
}

impl TokenConfig {
    /// Minimum secret length (in bytes) accepted for production deployments.
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Create a new token configuration.
    ///
    /// # Arguments
    /// * `secret` - Symmetric HMAC secret
    /// * `lifetime` - How long issued tokens stay valid
    /// * `issuer` - Value written to and required in the `iss` claim
    pub fn new(
        secret: impl Into<Vec<u8>>,
        lifetime: Duration,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            secret: secret.into(),
            lifetime,
            issuer: issuer.into(),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Whether the secret meets [`Self::MIN_SECRET_LENGTH`].
    pub fn has_strong_secret(&self) -> bool {
        self.secret.len() >= Self::MIN_SECRET_LENGTH
    }

    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("lifetime", &self.lifetime)
            .field("issuer", &self.issuer)
            .finish()
    }
}
