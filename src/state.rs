use std::sync::Arc;

use gatekeep_config::{CorsConfig, DatabaseConfig, JwtConfig};
use gatekeep_core::{BcryptCredentialStore, CredentialStore, PermissionRegistry};
use gatekeep_db::{
    InMemoryTenantRepository, PgTenantRepository, TenantRepository, init_db_pool, run_migrations,
};

/// Shared, read-only collaborators injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn TenantRepository>,
    pub credentials: Arc<dyn CredentialStore>,
    pub registry: Arc<PermissionRegistry>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    /// State over the given repository with the default registry and bcrypt.
    pub fn new(repository: Arc<dyn TenantRepository>, jwt_config: JwtConfig) -> Self {
        Self {
            repository,
            credentials: Arc::new(BcryptCredentialStore::default()),
            registry: Arc::new(PermissionRegistry::default()),
            jwt_config,
            cors_config: CorsConfig::from_env(),
        }
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = credentials;
        self
    }
}

/// Connects the repository named by the environment.
///
/// With `DATABASE_URL` set, migrations are applied and PostgreSQL is used;
/// otherwise data lives in memory for the lifetime of the process.
pub async fn init_repository(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn TenantRepository>> {
    match init_db_pool(config).await? {
        Some(pool) => {
            run_migrations(&pool).await?;
            Ok(Arc::new(PgTenantRepository::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory repository");
            Ok(Arc::new(InMemoryTenantRepository::new()))
        }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let repository = init_repository(&DatabaseConfig::from_env()).await?;
    let state = AppState::new(repository, JwtConfig::from_env());

    // Computed up front so the first failed login costs the same as later ones.
    state.credentials.decoy_digest().await?;
    Ok(state)
}
