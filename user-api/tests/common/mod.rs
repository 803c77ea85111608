#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::TokenConfig;
use auth::TokenService;
use serde_json::json;
use serde_json::Value;
use user_api::inbound::http::middleware::rate_limit::RateLimiter;
use user_api::inbound::http::router::create_router;
use user_api::inbound::http::router::AppState;
use user_api::outbound::repositories::InMemoryUserRepository;

pub const JWT_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const JWT_ISSUER: &str = "user-api-test";
pub const TOKEN_LIFETIME_SECONDS: i64 = 3600;

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
}

pub fn token_config(lifetime: chrono::Duration) -> TokenConfig {
    TokenConfig::new(JWT_SECRET, lifetime, JWT_ISSUER)
}

/// Token service sharing the server's secret and issuer.
pub fn token_service(lifetime: chrono::Duration) -> TokenService {
    TokenService::new(token_config(lifetime))
}

impl TestApp {
    /// Spawn the application with a rate limit high enough to stay out of the way.
    pub async fn spawn() -> Self {
        Self::spawn_with_rate_limit(10_000, Duration::from_secs(60)).await
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn_with_rate_limit(max_requests: u32, window: Duration) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(token_config(
            chrono::Duration::seconds(TOKEN_LIFETIME_SECONDS),
        )));
        let state = AppState::new(Arc::new(InMemoryUserRepository::new()), authenticator);

        let router = create_router(
            state,
            RateLimiter::new(max_requests, window),
            Duration::from_secs(30),
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.put(self.url(path)).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(self.url(path)).bearer_auth(token)
    }

    /// Register an account and return the raw response.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/v1/auth/register")
            .json(&json!({
                "name": name,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the raw response.
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/v1/auth/login")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register an account and return its token and user id.
    pub async fn register_and_token(&self, email: &str) -> (String, String) {
        let body: Value = self
            .register("Test User", email, "secret123")
            .await
            .json()
            .await
            .expect("Failed to parse response");

        (
            body["data"]["token"].as_str().unwrap().to_string(),
            body["data"]["user"]["id"].as_str().unwrap().to_string(),
        )
    }
}
