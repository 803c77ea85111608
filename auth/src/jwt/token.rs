use std::fmt;

use chrono::DateTime;
use chrono::Utc;

/// Signed compact token (`header.payload.signature`) together with its expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl SignedToken {
    pub(crate) fn new(value: String, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Absolute instant after which the token is rejected.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

// Tokens are bearer credentials; keep them out of debug output and logs.
impl fmt::Debug for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
