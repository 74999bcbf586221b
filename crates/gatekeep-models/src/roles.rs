//! Role models and DTOs.
//!
//! A role is a named bundle of registered permissions scoped to one
//! application.

use gatekeep_core::SystemRole;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ApplicationId, RoleId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub application_id: ApplicationId,
    pub permissions: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Input for persisting a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    pub name: String,
    pub application_id: ApplicationId,
    pub permissions: Vec<String>,
}

/// Request body for creating a custom role in the caller's application.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRoleDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// The permission registry as exposed to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PermissionsResponse {
    pub version: u32,
    pub permissions: Vec<String>,
    pub default_permissions: Vec<String>,
    pub system_roles: Vec<SystemRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_role_dto_validation() {
        let valid = CreateRoleDto {
            name: "Editor".to_string(),
            permissions: vec!["posts:update".to_string()],
        };
        assert!(valid.validate().is_ok());

        let empty_name = CreateRoleDto {
            name: String::new(),
            permissions: vec![],
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_create_role_dto_permissions_default_to_empty() {
        let dto: CreateRoleDto = serde_json::from_str(r#"{"name":"Viewer"}"#).unwrap();
        assert!(dto.permissions.is_empty());
    }
}
