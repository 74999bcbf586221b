//! Application (tenant) models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::ApplicationId;
use crate::roles::Role;

/// An isolated tenant owning its own roles, users and assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Application {
    pub id: ApplicationId,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateApplicationDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,
}

/// A freshly bootstrapped application with both of its system roles.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProvisionedApplication {
    pub application: Application,
    pub super_admin_role: Role,
    pub application_user_role: Role,
}
