//! JWT claim structure for access tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// JWT claims for access tokens.
///
/// # Fields
///
/// - `sub`: User ID (subject)
/// - `email`: User's email address
/// - `application_id`: The tenant the user authenticated against
/// - `scopes`: Aggregated permissions of every role the user holds in that tenant
/// - `exp`: Token expiration timestamp
/// - `iat`: Token issued-at timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// User's email address
    pub email: String,
    /// Tenant the token is valid for
    pub application_id: Uuid,
    /// Permission names granted at issuance
    pub scopes: Vec<String>,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    /// True when every required scope is present. An empty requirement is always satisfied.
    pub fn has_all_scopes(&self, required: &[&str]) -> bool {
        required.iter().all(|scope| self.has_scope(scope))
    }
}
