//! Credential store: password hashing and verification.
//!
//! Services only see the [`CredentialStore`] trait, so the hashing primitive is
//! swappable. The default implementation uses bcrypt and runs it on Tokio's
//! blocking pool so request workers never stall on a hash.

use std::sync::Arc;

use async_trait::async_trait;
use bcrypt::{DEFAULT_COST, hash, verify};
use tokio::sync::OnceCell;
use tokio::task::{JoinError, spawn_blocking};

/// Plaintext behind the decoy digest. Never a valid user password: it is
/// shorter than the registration minimum.
const DECOY_PLAINTEXT: &str = "decoy";

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("failed to hash credential: {0}")]
    Hash(#[source] bcrypt::BcryptError),
    #[error("failed to verify credential: {0}")]
    Verify(#[source] bcrypt::BcryptError),
    #[error("credential task failed: {0}")]
    Task(#[source] JoinError),
}

/// Opaque `hash` / `verify` operations over user credentials.
///
/// A failing `verify` is treated by callers exactly like a mismatch; a failing
/// `hash` is fatal for the operation in progress.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn hash(&self, plaintext: &str) -> Result<String, CredentialError>;

    async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, CredentialError>;

    /// A digest produced at the same cost as real ones, for verifying against
    /// when no stored digest exists. Computed once and reused.
    async fn decoy_digest(&self) -> Result<String, CredentialError>;
}

#[derive(Debug, Clone)]
pub struct BcryptCredentialStore {
    cost: u32,
    decoy: Arc<OnceCell<String>>,
}

impl BcryptCredentialStore {
    /// `cost` must lie in bcrypt's accepted range (4..=31).
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost,
            decoy: Arc::new(OnceCell::new()),
        }
    }
}

impl Default for BcryptCredentialStore {
    fn default() -> Self {
        Self::with_cost(DEFAULT_COST)
    }
}

#[async_trait]
impl CredentialStore for BcryptCredentialStore {
    async fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;

        spawn_blocking(move || hash(plaintext, cost))
            .await
            .map_err(CredentialError::Task)?
            .map_err(CredentialError::Hash)
    }

    async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, CredentialError> {
        let plaintext = plaintext.to_owned();
        let digest = digest.to_owned();

        spawn_blocking(move || verify(plaintext, &digest))
            .await
            .map_err(CredentialError::Task)?
            .map_err(CredentialError::Verify)
    }

    async fn decoy_digest(&self) -> Result<String, CredentialError> {
        self.decoy
            .get_or_try_init(|| self.hash(DECOY_PLAINTEXT))
            .await
            .cloned()
    }
}
