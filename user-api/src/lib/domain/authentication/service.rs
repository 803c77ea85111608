use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::models::AuthResult;
use crate::domain::authentication::ports::AuthServicePort;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::ports::UserRepository;

/// Login, registration and current-user use cases.
///
/// Failures never leave partial writes behind: registration stores the
/// account only after hashing succeeds, and issues the token last.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    fn auth_result(&self, user: User, token: auth::SignedToken) -> AuthResult {
        AuthResult::new(token, self.authenticator.token_lifetime(), user)
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let Some(user) = self.repository.find_by_email(email).await? else {
            return Err(self.authenticator.reject_unknown(password).into());
        };

        let token = self.authenticator.authenticate(
            password,
            &user.password_hash,
            &user.id.to_string(),
            user.email.as_str(),
        )?;

        Ok(self.auth_result(user, token))
    }

    async fn register(&self, command: CreateUserCommand) -> Result<AuthResult, AuthError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(AuthError::Conflict(command.email.as_str().to_string()));
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: command.name,
            email: command.email,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        // The store re-checks uniqueness atomically, covering concurrent registrations.
        let user = self.repository.create(user).await?;
        tracing::info!(user_id = %user.id, "User registered");

        let token = self
            .authenticator
            .issue_token(&user.id.to_string(), user.email.as_str())?;

        Ok(self.auth_result(user, token))
    }

    async fn current_user(&self, id: &UserId) -> Result<User, AuthError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound(id.to_string()))
    }
}
