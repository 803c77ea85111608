use axum::extract::State;
use axum::http::StatusCode;

use super::get_user::UserResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    _caller: AuthenticatedUser,
) -> Result<ApiSuccess<Vec<UserResponseData>>, ApiError> {
    let users = state.user_service.list_users().await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        users.iter().map(UserResponseData::from).collect(),
    ))
}
