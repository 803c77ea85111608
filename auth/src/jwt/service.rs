use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::IdentityClaims;
use super::config::TokenConfig;
use super::errors::JwtError;
use super::token::SignedToken;

/// Issues and validates HS256 access tokens.
///
/// Stateless apart from the immutable signing configuration, so a single
/// instance can be shared across request handlers behind an `Arc`.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
    issuer: String,
}

impl TokenService {
    /// The only algorithm accepted when validating tokens.
    pub const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Create a token service from its configuration.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(config: TokenConfig) -> Self {
        let mut validation = Validation::new(Self::ALGORITHM);
        validation.set_issuer(&[config.issuer()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);
        validation.validate_aud = false;
        // Time window is enforced in `validate_at` with zero leeway.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret()),
            decoding_key: DecodingKey::from_secret(config.secret()),
            validation,
            lifetime: config.lifetime(),
            issuer: config.issuer().to_string(),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Issue a token for a subject.
    ///
    /// # Arguments
    /// * `subject` - User identifier written to `sub`
    /// * `email` - Email written to the `email` claim
    ///
    /// # Returns
    /// Signed token valid from now for the configured lifetime
    ///
    /// # Errors
    /// * `SigningFailed` - The expiry is not representable, or the signing primitive failed
    pub fn issue(&self, subject: &str, email: &str) -> Result<SignedToken, JwtError> {
        self.issue_at(subject, email, Utc::now())
    }

    fn issue_at(
        &self,
        subject: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<SignedToken, JwtError> {
        let expires_at = now.checked_add_signed(self.lifetime).ok_or_else(|| {
            JwtError::SigningFailed("token expiry is out of range".to_string())
        })?;

        let claims = IdentityClaims::new(subject, email, &self.issuer, now, self.lifetime);
        let token = self.sign(&claims)?;

        Ok(SignedToken::new(token, expires_at))
    }

    fn sign(&self, claims: &IdentityClaims) -> Result<String, JwtError> {
        encode(&Header::new(Self::ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| JwtError::SigningFailed(e.to_string()))
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `InvalidToken` - Malformed, wrong algorithm, bad signature, wrong issuer, or not yet valid
    /// * `ExpiredToken` - Signature and issuer are fine but the token is past `exp`
    pub fn validate(&self, token: &str) -> Result<IdentityClaims, JwtError> {
        self.validate_at(token, Utc::now().timestamp())
    }

    pub(crate) fn validate_at(&self, token: &str, now: i64) -> Result<IdentityClaims, JwtError> {
        let claims = decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| JwtError::InvalidToken)?
            .claims;

        if claims.is_expired(now) {
            return Err(JwtError::ExpiredToken);
        }

        if claims.is_premature(now) {
            return Err(JwtError::InvalidToken);
        }

        Ok(claims)
    }
}
