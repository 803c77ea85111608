pub mod claims;
pub mod config;
pub mod errors;
pub mod service;
pub mod token;

pub use claims::IdentityClaims;
pub use config::TokenConfig;
pub use errors::JwtError;
pub use service::TokenService;
pub use token::SignedToken;
