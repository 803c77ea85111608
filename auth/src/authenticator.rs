use chrono::Duration;

use crate::jwt::IdentityClaims;
use crate::jwt::JwtError;
use crate::jwt::SignedToken;
use crate::jwt::TokenConfig;
use crate::jwt::TokenService;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_service: TokenService,
}

/// Authentication operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("token error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `config` - Token signing configuration
    pub fn new(config: TokenConfig) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_service: TokenService::new(config),
        }
    }

    /// Lifetime of tokens issued by this authenticator.
    pub fn token_lifetime(&self) -> Duration {
        self.token_service.lifetime()
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token for the subject.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - User identifier for the `sub` claim
    /// * `email` - Email for the `email` claim
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is unusable
    /// * `JwtError` - Token signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        email: &str,
    ) -> Result<SignedToken, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.token_service.issue(subject, email)?)
    }

    /// Burn one password verification and report invalid credentials.
    ///
    /// Used when no account matches the login identifier, so the response
    /// takes as long as a wrong-password attempt.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        self.password_hasher.verify_dummy(password);
        AuthenticationError::InvalidCredentials
    }

    /// Issue a token without password verification (e.g. right after registration).
    ///
    /// # Errors
    /// * `SigningFailed` - Token signing failed
    pub fn issue_token(&self, subject: &str, email: &str) -> Result<SignedToken, JwtError> {
        self.token_service.issue(subject, email)
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is malformed, forged, or not valid yet
    /// * `ExpiredToken` - Token is past its expiration
    pub fn validate_token(&self, token: &str) -> Result<IdentityClaims, JwtError> {
        self.token_service.validate(token)
    }
}
