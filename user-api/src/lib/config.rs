use std::env;

use auth::TokenConfig;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Signing secret used when none is configured outside production.
pub const DEVELOPMENT_JWT_SECRET: &str = "dev-secret-do-not-use-in-production";

/// Longest accepted token lifetime (ten years).
pub const MAX_JWT_EXPIRATION_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub http_port: u16,
    pub request_timeout_seconds: u64,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: String,
    pub expiration_seconds: i64,
    pub issuer: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_seconds: u64,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("app.environment", run_mode.as_str())?
            .set_default("app.log_level", "info")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.http_port", 8080)?
            .set_default("server.request_timeout_seconds", 60)?
            .set_default("jwt.expiration_seconds", 86_400)?
            .set_default("jwt.issuer", "user-api")?
            .set_default("rate_limit.max_requests", 100)?
            .set_default("rate_limit.window_seconds", 60)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let mut config: Config = configuration.try_deserialize()?;
        config.finalize()?;

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// Check cross-field constraints and apply the development secret fallback.
    pub fn finalize(&mut self) -> Result<(), ConfigError> {
        if self.jwt.expiration_seconds <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_seconds must be positive".to_string(),
            ));
        }

        if self.jwt.expiration_seconds > MAX_JWT_EXPIRATION_SECONDS {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_seconds must be at most {}",
                MAX_JWT_EXPIRATION_SECONDS
            )));
        }

        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::Message(
                "rate_limit.max_requests must be positive".to_string(),
            ));
        }

        if self.rate_limit.window_seconds == 0 {
            return Err(ConfigError::Message(
                "rate_limit.window_seconds must be positive".to_string(),
            ));
        }

        if self.is_production() {
            if self.jwt.secret.is_empty() {
                return Err(ConfigError::Message(
                    "jwt.secret is required in production".to_string(),
                ));
            }
            if self.jwt.secret.len() < TokenConfig::MIN_SECRET_LENGTH {
                return Err(ConfigError::Message(format!(
                    "jwt.secret must be at least {} bytes in production",
                    TokenConfig::MIN_SECRET_LENGTH
                )));
            }
        } else if self.jwt.secret.is_empty() {
            self.jwt.secret = DEVELOPMENT_JWT_SECRET.to_string();
        }

        Ok(())
    }
}

impl JwtConfig {
    /// Token signing configuration for the `auth` crate.
    pub fn token_config(&self) -> TokenConfig {
        TokenConfig::new(
            self.secret.as_bytes(),
            chrono::Duration::seconds(self.expiration_seconds),
            self.issuer.clone(),
        )
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_seconds", &self.expiration_seconds)
            .field("issuer", &self.issuer)
            .finish()
    }
}
