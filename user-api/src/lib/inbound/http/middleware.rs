use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

pub mod rate_limit;
pub mod security_headers;

const BEARER_PREFIX: &str = "Bearer ";

const MISSING_AUTHORIZATION: &str = "missing authorization header";
const INVALID_TOKEN: &str = "invalid token";
const EXPIRED_TOKEN: &str = "token has expired";

/// Identity of the caller, placed in request extensions by [`authenticate`].
///
/// Handlers take it as an extractor argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized(MISSING_AUTHORIZATION.to_string()))
    }
}

/// Middleware that validates the bearer token and records the caller.
///
/// Every failure is a 401; only expiry is distinguished from other causes.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&req)?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(reason = %e, "Token rejected");
        match e {
            auth::JwtError::ExpiredToken => ApiError::Unauthorized(EXPIRED_TOKEN.to_string()),
            _ => ApiError::Unauthorized(INVALID_TOKEN.to_string()),
        }
    })?;

    let user_id = UserId::from_string(claims.subject()).map_err(|_| {
        tracing::warn!("Token subject is not a user id");
        ApiError::Unauthorized(INVALID_TOKEN.to_string())
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email,
    });

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Result<&str, ApiError> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| {
            tracing::warn!("Request without bearer credentials");
            ApiError::Unauthorized(MISSING_AUTHORIZATION.to_string())
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use auth::Authenticator;
    use auth::TokenConfig;
    use auth::TokenService;
    use axum::body::to_bytes;
    use axum::body::Body;
    use axum::http::Request;
    use axum::http::StatusCode;
    use axum::middleware;
    use axum::routing::get;
    use axum::Router;
    use chrono::Duration;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::outbound::repositories::InMemoryUserRepository;

    const SECRET: &str = "middleware-test-secret-at-least-32-bytes";
    const ISSUER: &str = "user-api-test";

    fn token_config(lifetime: Duration) -> TokenConfig {
        TokenConfig::new(SECRET, lifetime, ISSUER)
    }

    fn app() -> Router {
        let authenticator = Arc::new(Authenticator::new(token_config(Duration::hours(1))));
        let state = AppState::new(Arc::new(InMemoryUserRepository::new()), authenticator);

        async fn whoami(caller: AuthenticatedUser) -> String {
            format!("{} {}", caller.user_id, caller.email)
        }

        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
            .with_state(state)
    }

    fn request(authorization: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn error_message(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        body["error"]["message"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let user_id = UserId::new();
        let token = TokenService::new(token_config(Duration::hours(1)))
            .issue(&user_id.to_string(), "ada@example.com")
            .unwrap();

        let response = app()
            .oneshot(request(Some(format!("Bearer {}", token.as_str()))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            String::from_utf8(bytes.to_vec()).unwrap(),
            format!("{} ada@example.com", user_id)
        );
    }

    #[tokio::test]
    async fn test_missing_header() {
        let response = app().oneshot(request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(response).await, MISSING_AUTHORIZATION);
    }

    #[tokio::test]
    async fn test_wrong_scheme() {
        for value in ["Basic abc", "bearer abc", "Bearer", "Bearerabc"] {
            let response = app().oneshot(request(Some(value.to_string()))).await.unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(error_message(response).await, MISSING_AUTHORIZATION);
        }
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let response = app()
            .oneshot(request(Some("Bearer not.a.jwt".to_string())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(response).await, INVALID_TOKEN);
    }

    #[tokio::test]
    async fn test_expired_token() {
        let token = TokenService::new(token_config(Duration::seconds(-10)))
            .issue(&UserId::new().to_string(), "ada@example.com")
            .unwrap();

        let response = app()
            .oneshot(request(Some(format!("Bearer {}", token.as_str()))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(response).await, EXPIRED_TOKEN);
    }

    #[tokio::test]
    async fn test_foreign_secret() {
        let foreign = TokenService::new(TokenConfig::new(
            "another-secret-that-is-at-least-32-bytes",
            Duration::hours(1),
            ISSUER,
        ));
        let token = foreign
            .issue(&UserId::new().to_string(), "ada@example.com")
            .unwrap();

        let response = app()
            .oneshot(request(Some(format!("Bearer {}", token.as_str()))))
            .await
            .unwrap();

        assert_eq!(error_message(response).await, INVALID_TOKEN);
    }

    #[tokio::test]
    async fn test_subject_must_be_user_id() {
        let token = TokenService::new(token_config(Duration::hours(1)))
            .issue("not-a-uuid", "ada@example.com")
            .unwrap();

        let response = app()
            .oneshot(request(Some(format!("Bearer {}", token.as_str()))))
            .await
            .unwrap();

        assert_eq!(error_message(response).await, INVALID_TOKEN);
    }

    #[tokio::test]
    async fn test_extractor_without_middleware_rejects() {
        async fn whoami(caller: AuthenticatedUser) -> String {
            caller.email
        }

        let response = Router::new()
            .route("/whoami", get(whoami))
            .oneshot(request(None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
