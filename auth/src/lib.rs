//! Authentication utilities library
//!
//! Provides the authentication building blocks used by the user API:
//! - Password hashing (Argon2id)
//! - HS256 access token issuance and validation
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{TokenConfig, TokenService};
//! use chrono::Duration;
//!
//! let config = TokenConfig::new(
//!     "secret_key_at_least_32_bytes_long!",
//!     Duration::hours(24),
//!     "user-api",
//! );
//! let service = TokenService::new(config);
//! let token = service.issue("user123", "alice@example.com").unwrap();
//! let claims = service.validate(token.as_str()).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, TokenConfig};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(TokenConfig::new(
//!     "secret_key_at_least_32_bytes_long!",
//!     Duration::hours(24),
//!     "user-api",
//! ));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let token = auth
//!     .authenticate("password123", &hash, "user123", "alice@example.com")
//!     .unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(token.as_str()).unwrap();
//! assert_eq!(claims.email, "alice@example.com");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::IdentityClaims;
pub use jwt::JwtError;
pub use jwt::SignedToken;
pub use jwt::TokenConfig;
pub use jwt::TokenService;
pub use password::PasswordError;
pub use password::PasswordHasher;
