//! Database connection settings.
//!
//! - `DATABASE_URL`: PostgreSQL connection string. Optional: without it the
//!   server runs on the in-memory repository.
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default 5)

use std::env;

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            max_connections: crate::env_or("DATABASE_MAX_CONNECTIONS", 5),
        }
    }
}
