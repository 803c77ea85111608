use auth::SignedToken;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::user::models::User;

/// Outcome of a successful login or registration. Never persisted.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: SignedToken,
    pub expires_at: DateTime<Utc>,
    /// Configured token lifetime, reported to clients as `expires_in`.
    pub expires_in: Duration,
    pub user: User,
}

impl AuthResult {
    pub fn new(token: SignedToken, expires_in: Duration, user: User) -> Self {
        Self {
            expires_at: token.expires_at(),
            token,
            expires_in,
            user,
        }
    }
}
