//! # Gatekeep Config
//!
//! Configuration types for the Gatekeep API, loaded from environment variables:
//!
//! - [`jwt`]: token signing secret and expiry
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`database`]: PostgreSQL connection settings
//! - [`server`]: listen address
//!
//! # Example
//!
//! ```ignore
//! use gatekeep_config::{CorsConfig, DatabaseConfig, JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let database_config = DatabaseConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

/// Reads and parses an environment variable, falling back to `default`.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
