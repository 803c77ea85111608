use async_trait::async_trait;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::models::AuthResult;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for authentication use cases.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and issue a token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Internal` - Hash verification or signing failed
    async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError>;

    /// Create an account and issue a token for it.
    ///
    /// # Errors
    /// * `Conflict` - Email is already registered
    /// * `Internal` - Hashing, storage or signing failed
    async fn register(&self, command: CreateUserCommand) -> Result<AuthResult, AuthError>;

    /// Resolve the user behind an authenticated subject.
    ///
    /// # Errors
    /// * `UserNotFound` - The account no longer exists
    async fn current_user(&self, id: &UserId) -> Result<User, AuthError>;
}
