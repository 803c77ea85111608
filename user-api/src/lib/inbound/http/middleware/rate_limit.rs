//! Per-client fixed-window rate limiting.
//!
//! Counters live in memory; each client key gets `max_requests` per window.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ConnectInfo;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::inbound::http::handlers::ApiError;

const X_REAL_IP: &str = "x-real-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";

#[derive(Debug, Clone, Copy)]
struct ClientWindow {
    count: u32,
    window_start: Instant,
}

/// Shared rate limiter state.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: Arc<Mutex<HashMap<String, ClientWindow>>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a request from `key`; `false` when it exceeds the quota.
    pub async fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now()).await
    }

    async fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut clients = self.clients.lock().await;

        let client = clients.entry(key.to_string()).or_insert(ClientWindow {
            count: 0,
            window_start: now,
        });

        if now.duration_since(client.window_start) >= self.window {
            client.count = 0;
            client.window_start = now;
        }

        if client.count >= self.max_requests {
            false
        } else {
            client.count += 1;
            true
        }
    }

    /// Drop clients whose window ended before `now`.
    async fn evict_idle(&self, now: Instant) {
        let window = self.window;
        self.clients
            .lock()
            .await
            .retain(|_, client| now.duration_since(client.window_start) < window);
    }

    #[cfg(test)]
    async fn tracked_clients(&self) -> usize {
        self.clients.lock().await.len()
    }

    /// Evict idle clients once per window until every limiter handle is dropped.
    pub fn spawn_cleanup(&self) -> JoinHandle<()> {
        let clients = Arc::downgrade(&self.clients);
        let max_requests = self.max_requests;
        let window = self.window;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(window);
            loop {
                interval.tick().await;

                let Some(clients) = clients.upgrade() else {
                    break;
                };
                let limiter = RateLimiter {
                    max_requests,
                    window,
                    clients,
                };
                limiter.evict_idle(Instant::now()).await;
            }
        })
    }
}

fn header_value<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Client key: `X-Real-IP`, else the first `X-Forwarded-For` hop, else the peer address.
fn client_key(request: &Request) -> String {
    if let Some(ip) = header_value(request, X_REAL_IP) {
        return ip.to_string();
    }

    if let Some(forwarded) = header_value(request, X_FORWARDED_FOR) {
        if let Some(first) = forwarded.split(',').map(str::trim).find(|hop| !hop.is_empty()) {
            return first.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware rejecting clients over their quota with 429 and `Retry-After`.
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);

    if !limiter.check(&key).await {
        tracing::warn!(client = %key, "Rate limit exceeded");

        let mut response =
            ApiError::TooManyRequests("Too many requests, please try again later".to_string())
                .into_response();
        response.headers_mut().insert(
            header::RETRY_AFTER,
            HeaderValue::from(limiter.window().as_secs()),
        );
        return response;
    }

    next.run(request).await
}
