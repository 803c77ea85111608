use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Identity claims carried by every access token.
///
/// Registered RFC 7519 claims plus the `email` claim, which is copied at
/// issuance time and may go stale if the account email changes later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityClaims {
    /// Subject (user identifier)
    pub sub: String,

    /// Email of the subject at issuance time
    pub email: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique token identifier)
    pub jti: String,
}

impl IdentityClaims {
    /// Build claims for a subject issued at `issued_at`.
    ///
    /// # Arguments
    /// * `subject` - Unique user identifier
    /// * `email` - Email claim
    /// * `issuer` - Signing authority
    /// * `issued_at` - Issuance instant (truncated to seconds)
    /// * `lifetime` - Token lifetime; zero or negative yields an already expired token
    ///
    /// # Returns
    /// Claims with `iat = nbf = issued_at` and `exp = issued_at + lifetime`
    pub fn new(
        subject: impl ToString,
        email: impl ToString,
        issuer: impl ToString,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        let now = issued_at.timestamp();

        Self {
            sub: subject.to_string(),
            email: email.to_string(),
            iss: issuer.to_string(),
            iat: now,
            nbf: now,
            exp: now + lifetime.num_seconds(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Check if the token is expired. Validity window is `[nbf, exp)`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }

    /// Check if the token is not valid yet.
    pub fn is_premature(&self, current_timestamp: i64) -> bool {
        current_timestamp < self.nbf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims() {
        let issued_at = Utc::now();
        let claims = IdentityClaims::new(
            "user123",
            "alice@example.com",
            "test-issuer",
            issued_at,
            Duration::hours(24),
        );

        assert_eq!(claims.subject(), "user123");
        assert_eq!(claims.email(), "alice@example.com");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.iat, issued_at.timestamp());
        assert_eq!(claims.nbf, claims.iat);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_jti_is_unique() {
        let now = Utc::now();
        let lifetime = Duration::hours(1);
        let first = IdentityClaims::new("user123", "a@example.com", "iss", now, lifetime);
        let second = IdentityClaims::new("user123", "a@example.com", "iss", now, lifetime);

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_is_expired() {
        let mut claims =
            IdentityClaims::new("user123", "a@example.com", "iss", Utc::now(), Duration::zero());
        claims.exp = 1000;

        assert!(!claims.is_expired(999)); // Not expired
        assert!(claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001)); // Expired
    }

    #[test]
    fn test_is_premature() {
        let mut claims =
            IdentityClaims::new("user123", "a@example.com", "iss", Utc::now(), Duration::hours(1));
        claims.nbf = 1000;

        assert!(claims.is_premature(999));
        assert!(!claims.is_premature(1000));
    }
}
