use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::UserData;
use crate::domain::authentication::models::AuthResult;
use crate::domain::authentication::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    if body.email.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "email and password are required".to_string(),
        ));
    }

    let result = state
        .auth_service
        .login(&body.email, &body.password)
        .await
        .map_err(|e| {
            tracing::info!(reason = %e, "Login rejected");
            ApiError::from(e)
        })?;

    Ok(ApiSuccess::new(StatusCode::OK, (&result).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// Body returned by both login and registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponseData {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    pub user: UserData,
}

impl From<&AuthResult> for AuthResponseData {
    fn from(result: &AuthResult) -> Self {
        Self {
            token: result.token.as_str().to_string(),
            expires_in: result.expires_in.num_seconds(),
            expires_at: result.expires_at,
            user: (&result.user).into(),
        }
    }
}
