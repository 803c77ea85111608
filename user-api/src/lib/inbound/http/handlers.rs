use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::authentication::errors::AuthError;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

pub mod create_user;
pub mod delete_user;
pub mod get_user;
pub mod health;
pub mod list_users;
pub mod login;
pub mod me;
pub mod register;
pub mod update_user;

/// Message rendered for every `INTERNAL_ERROR`; details only go to the log.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    RequestTimeout(String),
    TooManyRequests(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Machine-readable code carried in the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InternalServerError(_) => "INTERNAL_ERROR",
            ApiError::UnprocessableEntity(_) => "VALIDATION_ERROR",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::RequestTimeout(_) => "REQUEST_TIMEOUT",
            ApiError::TooManyRequests(_) => "RATE_LIMIT_EXCEEDED",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::BadRequest("invalid request body".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Internal error");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            ApiError::UnprocessableEntity(msg)
            | ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::RequestTimeout(msg)
            | ApiError::TooManyRequests(msg) => msg,
        };

        (status, Json(ApiResponseBody::new_error(code, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound("user not found".to_string()),
            UserError::EmailAlreadyExists(_) => {
                ApiError::Conflict("email already registered".to_string())
            }
            UserError::InvalidUserId(_) => ApiError::BadRequest(err.to_string()),
            UserError::InvalidName(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPassword(_) => ApiError::UnprocessableEntity(err.to_string()),
            UserError::Internal(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("invalid email or password".to_string())
            }
            AuthError::Conflict(_) => ApiError::Conflict("email already registered".to_string()),
            AuthError::UserNotFound(_) => ApiError::NotFound("user not found".to_string()),
            AuthError::Internal(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

/// JSON body extractor whose rejections render as the API error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `{ "success": ..., "data"?: ..., "error"?: { "code", "message" } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ApiErrorData>,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponseBody<()> {
    pub fn new_error(code: &str, message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiErrorData {
                code: code.to_string(),
                message,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub code: String,
    pub message: String,
}

/// Public view of a user. The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::json;
    use serde_json::Value;

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let response = ApiSuccess::new(StatusCode::OK, json!({ "id": 1 })).into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "success": true, "data": { "id": 1 } })
        );
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let response = ApiError::Conflict("email already registered".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": false,
                "error": { "code": "CONFLICT", "message": "email already registered" }
            })
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response =
            ApiError::from(UserError::Internal("connection reset".to_string())).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_user_error_mapping() {
        assert_eq!(
            ApiError::from(UserError::NotFound("x".to_string())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(UserError::EmailAlreadyExists("x".to_string())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(UserError::InvalidName(
                crate::user::errors::UserNameError::Empty
            ))
            .code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            ApiError::from(UserError::InvalidUserId(
                crate::user::errors::UserIdError::InvalidFormat("bad".to_string())
            ))
            .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_auth_error_mapping() {
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::Unauthorized("invalid email or password".to_string())
        );
        assert_eq!(
            ApiError::from(AuthError::UserNotFound("x".to_string())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(AuthError::Internal("x".to_string())).code(),
            "INTERNAL_ERROR"
        );
    }
}
