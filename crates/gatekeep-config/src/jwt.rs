use std::env;

/// Development fallback used when `JWT_SECRET` is unset.
pub const DEVELOPMENT_SECRET: &str = "gatekeep-development-secret-change-me";

/// Signing configuration for access tokens.
///
/// - `JWT_SECRET`: HMAC secret (falls back to [`DEVELOPMENT_SECRET`] with a warning)
/// - `JWT_ACCESS_EXPIRY`: token lifetime in seconds (default 3600)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using the development secret");
            DEVELOPMENT_SECRET.to_string()
        });

        Self {
            secret,
            access_token_expiry: crate::env_or("JWT_ACCESS_EXPIRY", 3600), // 1 hour
        }
    }
}
