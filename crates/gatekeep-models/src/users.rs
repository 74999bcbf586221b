//! User models, role assignments and permission-aggregation rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ApplicationId, RoleId, UserId};

/// A user as returned to clients. The password digest is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub application_id: ApplicationId,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Input for persisting a user. The credential is already hashed.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub application_id: ApplicationId,
    pub password_digest: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("application_id", &self.application_id)
            .finish_non_exhaustive()
    }
}

/// Registration request body.
#[derive(Deserialize, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Email must be valid"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub application_id: ApplicationId,
    /// Registers the application's super admin instead of a regular user.
    #[serde(default)]
    pub initial_user: bool,
}

impl std::fmt::Debug for CreateUserDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserDto")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("application_id", &self.application_id)
            .field("initial_user", &self.initial_user)
            .finish_non_exhaustive()
    }
}

/// Edge between a user and a role, scoped to the application both belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RoleAssignment {
    pub user_id: UserId,
    pub role_id: RoleId,
    pub application_id: ApplicationId,
}

/// Request body for assigning a role; the application comes from the caller's token.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AssignRoleToUserDto {
    pub user_id: UserId,
    pub role_id: RoleId,
}

/// One row of the users ⟕ assignments ⟕ roles join for a single `(email, application)`.
///
/// `permissions` is `None` when the user holds no role.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct UserRoleRow {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub application_id: ApplicationId,
    pub password_digest: String,
    pub permissions: Option<Vec<String>>,
}

impl std::fmt::Debug for UserRoleRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRoleRow")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("application_id", &self.application_id)
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}

/// A user with the union of permissions of every role it holds in its application.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub application_id: ApplicationId,
    pub password_digest: String,
    /// Deduplicated; order carries no meaning.
    pub permissions: Vec<String>,
}

impl std::fmt::Debug for ResolvedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("application_id", &self.application_id)
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}
