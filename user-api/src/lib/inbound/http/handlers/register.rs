use axum::extract::State;
use axum::http::StatusCode;

use super::create_user::CreateUserRequest;
use super::login::AuthResponseData;
use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use crate::domain::authentication::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Register a new account and sign it in. Same body as user creation.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateUserRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let result = state.auth_service.register(body.try_into_command()?).await?;

    Ok(ApiSuccess::new(StatusCode::CREATED, (&result).into()))
}
