//! In-memory [`TenantRepository`].
//!
//! Mirrors the PostgreSQL schema's constraints: unique role names and emails
//! per application, and assignments only within one application.

use async_trait::async_trait;
use chrono::Utc;
use gatekeep_models::{
    Application, ApplicationId, NewRole, NewUser, Role, RoleAssignment, RoleId, User, UserId,
    UserRoleRow,
};
use tokio::sync::RwLock;

use crate::repository::{RepositoryError, RepositoryResult, TenantRepository};

struct StoredUser {
    user: User,
    password_digest: String,
}

#[derive(Default)]
struct Tables {
    applications: Vec<Application>,
    roles: Vec<Role>,
    users: Vec<StoredUser>,
    assignments: Vec<RoleAssignment>,
}

impl Tables {
    fn application_exists(&self, id: ApplicationId) -> bool {
        self.applications.iter().any(|a| a.id == id)
    }
}

#[derive(Default)]
pub struct InMemoryTenantRepository {
    tables: RwLock<Tables>,
}

impl InMemoryTenantRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenantRepository for InMemoryTenantRepository {
    async fn create_application(&self, name: &str) -> RepositoryResult<Application> {
        let application = Application {
            id: ApplicationId::new(),
            name: name.to_string(),
            created_at: Utc::now(),
        };

        self.tables.write().await.applications.push(application.clone());
        Ok(application)
    }

    async fn list_applications(&self) -> RepositoryResult<Vec<Application>> {
        Ok(self.tables.read().await.applications.clone())
    }

    async fn create_role(&self, role: NewRole) -> RepositoryResult<Role> {
        let mut tables = self.tables.write().await;

        if !tables.application_exists(role.application_id) {
            return Err(RepositoryError::InvalidReference(format!(
                "application {} does not exist",
                role.application_id
            )));
        }
        if tables
            .roles
            .iter()
            .any(|r| r.application_id == role.application_id && r.name == role.name)
        {
            return Err(RepositoryError::Conflict(format!(
                "role {} already exists",
                role.name
            )));
        }

        let role = Role {
            id: RoleId::new(),
            name: role.name,
            application_id: role.application_id,
            permissions: role.permissions,
            created_at: Utc::now(),
        };
        tables.roles.push(role.clone());
        Ok(role)
    }

    async fn find_role_by_name(
        &self,
        application_id: ApplicationId,
        name: &str,
    ) -> RepositoryResult<Option<Role>> {
        let tables = self.tables.read().await;
        Ok(tables
            .roles
            .iter()
            .find(|r| r.application_id == application_id && r.name == name)
            .cloned())
    }

    async fn list_roles(&self, application_id: ApplicationId) -> RepositoryResult<Vec<Role>> {
        let tables = self.tables.read().await;
        Ok(tables
            .roles
            .iter()
            .filter(|r| r.application_id == application_id)
            .cloned()
            .collect())
    }

    async fn create_user(&self, user: NewUser) -> RepositoryResult<User> {
        let mut tables = self.tables.write().await;

        if !tables.application_exists(user.application_id) {
            return Err(RepositoryError::InvalidReference(format!(
                "application {} does not exist",
                user.application_id
            )));
        }
        if tables
            .users
            .iter()
            .any(|s| s.user.application_id == user.application_id && s.user.email == user.email)
        {
            return Err(RepositoryError::Conflict(format!(
                "email {} already registered",
                user.email
            )));
        }

        let created = User {
            id: UserId::new(),
            name: user.name,
            email: user.email,
            application_id: user.application_id,
            created_at: Utc::now(),
        };
        tables.users.push(StoredUser {
            user: created.clone(),
            password_digest: user.password_digest,
        });
        Ok(created)
    }

    async fn list_users_by_application(
        &self,
        application_id: ApplicationId,
    ) -> RepositoryResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|s| s.user.application_id == application_id)
            .map(|s| s.user.clone())
            .collect())
    }

    async fn create_role_assignment(
        &self,
        assignment: RoleAssignment,
    ) -> RepositoryResult<RoleAssignment> {
        let mut tables = self.tables.write().await;

        let user_in_application = tables.users.iter().any(|s| {
            s.user.id == assignment.user_id && s.user.application_id == assignment.application_id
        });
        let role_in_application = tables
            .roles
            .iter()
            .any(|r| r.id == assignment.role_id && r.application_id == assignment.application_id);
        if !user_in_application || !role_in_application {
            return Err(RepositoryError::InvalidReference(format!(
                "user {} and role {} must both belong to application {}",
                assignment.user_id, assignment.role_id, assignment.application_id
            )));
        }
        if tables.assignments.contains(&assignment) {
            return Err(RepositoryError::Conflict(format!(
                "role {} already assigned to user {}",
                assignment.role_id, assignment.user_id
            )));
        }

        tables.assignments.push(assignment.clone());
        Ok(assignment)
    }

    async fn find_user_role_rows(
        &self,
        application_id: ApplicationId,
        email: &str,
    ) -> RepositoryResult<Vec<UserRoleRow>> {
        let tables = self.tables.read().await;
        let mut rows = Vec::new();

        for stored in tables
            .users
            .iter()
            .filter(|s| s.user.application_id == application_id && s.user.email == email)
        {
            let row = |permissions: Option<Vec<String>>| UserRoleRow {
                id: stored.user.id,
                email: stored.user.email.clone(),
                name: stored.user.name.clone(),
                application_id: stored.user.application_id,
                password_digest: stored.password_digest.clone(),
                permissions,
            };

            let held: Vec<UserRoleRow> = tables
                .assignments
                .iter()
                .filter(|a| a.user_id == stored.user.id && a.application_id == application_id)
                .filter_map(|a| {
                    tables
                        .roles
                        .iter()
                        .find(|r| r.id == a.role_id && r.application_id == application_id)
                })
                .map(|role| row(Some(role.permissions.clone())))
                .collect();

            if held.is_empty() {
                rows.push(row(None));
            } else {
                rows.extend(held);
            }
        }

        Ok(rows)
    }
}
