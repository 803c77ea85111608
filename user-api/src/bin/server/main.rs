use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use user_api::config::Config;
use user_api::inbound::http::middleware::rate_limit::RateLimiter;
use user_api::inbound::http::router::create_router;
use user_api::inbound::http::router::AppState;
use user_api::outbound::repositories::InMemoryUserRepository;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.app.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;

    init_tracing(&config);

    tracing::info!(
        service = "user-api",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    tracing::info!(
        environment = %config.app.environment,
        http_port = config.server.http_port,
        jwt_issuer = %config.jwt.issuer,
        jwt_expiration_seconds = config.jwt.expiration_seconds,
        rate_limit_max_requests = config.rate_limit.max_requests,
        rate_limit_window_seconds = config.rate_limit.window_seconds,
        "Configuration loaded"
    );

    let token_config = config.jwt.token_config();
    if !token_config.has_strong_secret() {
        tracing::warn!("JWT secret is shorter than recommended; do not use in production");
    }

    let authenticator = Arc::new(Authenticator::new(token_config));
    let user_repository = Arc::new(InMemoryUserRepository::new());
    let state = AppState::new(user_repository, authenticator);

    let rate_limiter = RateLimiter::new(
        config.rate_limit.max_requests,
        Duration::from_secs(config.rate_limit.window_seconds),
    );
    let cleanup = rate_limiter.spawn_cleanup();

    let http_application = create_router(
        state,
        rate_limiter,
        Duration::from_secs(config.server.request_timeout_seconds),
    );

    let http_address = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(
        http_listener,
        http_application.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    cleanup.abort();
    tracing::info!("Server exited successfully");

    Ok(())
}
