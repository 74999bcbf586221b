//! # Gatekeep DB
//!
//! Persistence for applications, roles, users and role assignments.
//!
//! - [`repository`]: the [`TenantRepository`] trait every service depends on
//! - [`postgres`]: the PostgreSQL implementation backed by a SQLx pool
//! - [`memory`]: an in-memory implementation enforcing the same constraints,
//!   used by tests and by the server when no `DATABASE_URL` is configured
//!
//! # Example
//!
//! ```ignore
//! use gatekeep_config::DatabaseConfig;
//! use gatekeep_db::{init_db_pool, run_migrations, PgTenantRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     if let Some(pool) = init_db_pool(&DatabaseConfig::from_env()).await? {
//!         run_migrations(&pool).await?;
//!         let repository = PgTenantRepository::new(pool);
//!     }
//!     Ok(())
//! }
//! ```

pub mod memory;
pub mod postgres;
pub mod repository;

use gatekeep_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;

pub use memory::InMemoryTenantRepository;
pub use postgres::PgTenantRepository;
pub use repository::{RepositoryError, RepositoryResult, TenantRepository};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Connects to PostgreSQL when a database URL is configured.
///
/// Returns `Ok(None)` when `DATABASE_URL` is unset so the caller can fall
/// back to [`InMemoryTenantRepository`].
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<Option<PgPool>, sqlx::Error> {
    let Some(url) = config.url.as_deref() else {
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(url)
        .await?;

    tracing::info!(max_connections = config.max_connections, "Connected to database");
    Ok(Some(pool))
}

/// Applies the SQL migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
