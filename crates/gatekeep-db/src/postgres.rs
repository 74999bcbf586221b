//! PostgreSQL-backed [`TenantRepository`].

use async_trait::async_trait;
use gatekeep_models::{
    Application, ApplicationId, NewRole, NewUser, Role, RoleAssignment, RoleId, User, UserId,
    UserRoleRow,
};
use sqlx::PgPool;

use crate::repository::{RepositoryError, RepositoryResult, TenantRepository};

#[derive(Clone)]
pub struct PgTenantRepository {
    pool: PgPool,
}

impl PgTenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps constraint violations on writes to domain errors.
fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(db_err.message().to_string());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::InvalidReference(db_err.message().to_string());
        }
    }
    RepositoryError::Database(err)
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn create_application(&self, name: &str) -> RepositoryResult<Application> {
        sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (id, name)
            VALUES ($1, $2)
            RETURNING id, name, created_at
            "#,
        )
        .bind(ApplicationId::new())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn list_applications(&self) -> RepositoryResult<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(
            "SELECT id, name, created_at FROM applications ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }

    async fn create_role(&self, role: NewRole) -> RepositoryResult<Role> {
        sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (id, name, application_id, permissions)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, application_id, permissions, created_at
            "#,
        )
        .bind(RoleId::new())
        .bind(&role.name)
        .bind(role.application_id)
        .bind(&role.permissions)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn find_role_by_name(
        &self,
        application_id: ApplicationId,
        name: &str,
    ) -> RepositoryResult<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, application_id, permissions, created_at
            FROM roles
            WHERE application_id = $1 AND name = $2
            "#,
        )
        .bind(application_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    async fn list_roles(&self, application_id: ApplicationId) -> RepositoryResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, application_id, permissions, created_at
            FROM roles
            WHERE application_id = $1
            ORDER BY created_at, name
            "#,
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    async fn create_user(&self, user: NewUser) -> RepositoryResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, application_id, password)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, application_id, created_at
            "#,
        )
        .bind(UserId::new())
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.application_id)
        .bind(&user.password_digest)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn list_users_by_application(
        &self,
        application_id: ApplicationId,
    ) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, application_id, created_at
            FROM users
            WHERE application_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn create_role_assignment(
        &self,
        assignment: RoleAssignment,
    ) -> RepositoryResult<RoleAssignment> {
        sqlx::query_as::<_, RoleAssignment>(
            r#"
            INSERT INTO users_to_roles (user_id, role_id, application_id)
            VALUES ($1, $2, $3)
            RETURNING user_id, role_id, application_id
            "#,
        )
        .bind(assignment.user_id)
        .bind(assignment.role_id)
        .bind(assignment.application_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn find_user_role_rows(
        &self,
        application_id: ApplicationId,
        email: &str,
    ) -> RepositoryResult<Vec<UserRoleRow>> {
        let rows = sqlx::query_as::<_, UserRoleRow>(
            r#"
            SELECT
                u.id,
                u.email,
                u.name,
                u.application_id,
                u.password AS password_digest,
                r.permissions
            FROM users u
            LEFT JOIN users_to_roles ur
                ON ur.user_id = u.id AND ur.application_id = u.application_id
            LEFT JOIN roles r
                ON r.id = ur.role_id AND r.application_id = ur.application_id
            WHERE u.email = $1 AND u.application_id = $2
            "#,
        )
        .bind(email)
        .bind(application_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
