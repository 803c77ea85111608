use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::http::header;
use axum::http::HeaderName;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::BoxError;
use axum::Router;
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::request_id::MakeRequestUuid;
use tower_http::request_id::PropagateRequestIdLayer;
use tower_http::request_id::SetRequestIdLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::get_user::get_user;
use super::handlers::health::health;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::register::register;
use super::handlers::update_user::update_user;
use super::handlers::ApiError;
use super::middleware::authenticate;
use super::middleware::rate_limit::rate_limit;
use super::middleware::rate_limit::RateLimiter;
use super::middleware::security_headers::security_headers;
use crate::domain::authentication::service::AuthService;
use crate::domain::user::service::UserService;
use crate::outbound::repositories::InMemoryUserRepository;

const X_REQUEST_ID: &str = "x-request-id";

const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<InMemoryUserRepository>>,
    pub auth_service: Arc<AuthService<InMemoryUserRepository>>,
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    /// Wire both services over one shared credential store.
    pub fn new(repository: Arc<InMemoryUserRepository>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            user_service: Arc::new(UserService::new(
                Arc::clone(&repository),
                Arc::clone(&authenticator),
            )),
            auth_service: Arc::new(AuthService::new(repository, Arc::clone(&authenticator))),
            authenticator,
        }
    }
}

/// Render failures from the timeout layer as the API error envelope.
async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request timed out");
        ApiError::RequestTimeout("request timed out".to_string())
    } else {
        ApiError::InternalServerError(err.to_string())
    }
}

pub fn create_router(
    state: AppState,
    rate_limiter: RateLimiter,
    request_timeout: Duration,
) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(health))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/register", post(register));

    let protected_routes = Router::new()
        .route("/api/v1/me", get(me))
        .route("/api/v1/users", get(list_users).post(create_user))
        .route(
            "/api/v1/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();

            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
                request_id = %request_id,
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(X_REQUEST_ID),
        ])
        .max_age(CORS_MAX_AGE);

    // Outermost first.
    let middleware_stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(X_REQUEST_ID),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            X_REQUEST_ID,
        )))
        .layer(trace_layer)
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors_layer)
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn_with_state(rate_limiter, rate_limit));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware_stack)
        .with_state(state)
}
