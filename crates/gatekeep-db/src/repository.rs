//! The tenant repository contract.

use async_trait::async_trait;
use gatekeep_core::{AppError, ErrorCode};
use gatekeep_models::{
    Application, ApplicationId, NewRole, NewUser, Role, RoleAssignment, User, UserRoleRow,
};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A uniqueness constraint was violated (duplicate role name, email or assignment).
    #[error("conflict: {0}")]
    Conflict(String),
    /// A referenced row does not exist in the given application.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    /// Client-facing form of a repository failure.
    ///
    /// Conflicts become `409 conflict_code`, dangling references become
    /// `404 NOT_FOUND`, and every other failure is an opaque internal error.
    pub fn into_app_error(self, conflict_code: ErrorCode, message: impl Into<String>) -> AppError {
        match self {
            RepositoryError::Conflict(_) => AppError::conflict(conflict_code, message),
            RepositoryError::InvalidReference(_) => {
                AppError::not_found("Referenced resource does not exist in this application")
            }
            other => AppError::internal(other),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage for applications and everything scoped to them.
///
/// Implementations must enforce: role names unique per application, emails
/// unique per application, and assignments only between a user and a role of
/// the same application.
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn create_application(&self, name: &str) -> RepositoryResult<Application>;

    async fn list_applications(&self) -> RepositoryResult<Vec<Application>>;

    async fn create_role(&self, role: NewRole) -> RepositoryResult<Role>;

    async fn find_role_by_name(
        &self,
        application_id: ApplicationId,
        name: &str,
    ) -> RepositoryResult<Option<Role>>;

    async fn list_roles(&self, application_id: ApplicationId) -> RepositoryResult<Vec<Role>>;

    async fn create_user(&self, user: NewUser) -> RepositoryResult<User>;

    async fn list_users_by_application(
        &self,
        application_id: ApplicationId,
    ) -> RepositoryResult<Vec<User>>;

    async fn create_role_assignment(
        &self,
        assignment: RoleAssignment,
    ) -> RepositoryResult<RoleAssignment>;

    /// Left-joins the user identified by `(email, application_id)` with its
    /// roles in that application.
    ///
    /// Yields one row per held role, a single row with `permissions = None`
    /// for a user holding no role, and no rows when the user does not exist.
    async fn find_user_role_rows(
        &self,
        application_id: ApplicationId,
        email: &str,
    ) -> RepositoryResult<Vec<UserRoleRow>>;
}
