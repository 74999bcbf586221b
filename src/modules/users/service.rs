use std::collections::BTreeSet;

use gatekeep_core::{AppError, CredentialStore, ErrorCode, SystemRole};
use gatekeep_db::TenantRepository;
use gatekeep_models::{
    ApplicationId, CreateUserDto, NewUser, ResolvedUser, RoleAssignment, RoleId, User, UserId,
    UserRoleRow,
};
use gatekeep_observability::track_user_registered;
use serde_json::json;
use tracing::instrument;

use crate::modules::roles::service as role_service;

pub struct UserService;

impl UserService {
    /// Hashes the password and stores the user. Never returns the digest.
    #[instrument(skip(repository, credentials, password))]
    pub async fn create_user(
        repository: &dyn TenantRepository,
        credentials: &dyn CredentialStore,
        name: &str,
        email: &str,
        password: &str,
        application_id: ApplicationId,
    ) -> Result<User, AppError> {
        let password_digest = credentials.hash(password).await?;

        repository
            .create_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                application_id,
                password_digest,
            })
            .await
            .map_err(|e| {
                e.into_app_error(
                    ErrorCode::EmailAlreadyExists,
                    "Email already registered in this application",
                )
            })
    }

    /// Inserts the user/role edge. Existence of both ends within the
    /// application is enforced by the repository, not checked here.
    #[instrument(skip(repository))]
    pub async fn assign_role_to_user(
        repository: &dyn TenantRepository,
        user_id: UserId,
        role_id: RoleId,
        application_id: ApplicationId,
    ) -> Result<RoleAssignment, AppError> {
        repository
            .create_role_assignment(RoleAssignment {
                user_id,
                role_id,
                application_id,
            })
            .await
            .map_err(|e| {
                e.into_app_error(
                    ErrorCode::RoleAlreadyAssigned,
                    "Role already assigned to this user",
                )
            })
    }

    #[instrument(skip(repository))]
    pub async fn get_users_by_application(
        repository: &dyn TenantRepository,
        application_id: ApplicationId,
    ) -> Result<Vec<User>, AppError> {
        Ok(repository.list_users_by_application(application_id).await?)
    }

    /// Resolves a user together with its aggregated permissions.
    ///
    /// `None` means the user does not exist in this application; a user
    /// holding no role resolves with an empty permission list.
    #[instrument(skip(repository))]
    pub async fn get_user_by_email(
        repository: &dyn TenantRepository,
        email: &str,
        application_id: ApplicationId,
    ) -> Result<Option<ResolvedUser>, AppError> {
        let rows = repository.find_user_role_rows(application_id, email).await?;
        Ok(aggregate_user_rows(rows))
    }

    /// Registers a user under the system role its `initial_user` flag selects.
    ///
    /// The first user of an application may claim `SUPER_ADMIN`; once any user
    /// exists that claim is refused without writing anything. Two concurrent
    /// first registrations are not serialized against each other.
    #[instrument(skip(repository, credentials, dto), fields(email = %dto.email, application_id = %dto.application_id))]
    pub async fn register(
        repository: &dyn TenantRepository,
        credentials: &dyn CredentialStore,
        dto: CreateUserDto,
    ) -> Result<User, AppError> {
        let role_name = SystemRole::for_registration(dto.initial_user);
        let role =
            role_service::get_role_by_name(repository, role_name.name(), dto.application_id)
                .await?;

        if role_name == SystemRole::SuperAdmin {
            let existing = Self::get_users_by_application(repository, dto.application_id).await?;
            if !existing.is_empty() {
                return Err(AppError::bad_request(
                    ErrorCode::ApplicationAlreadySuperUser,
                    "User already exists for this application",
                )
                .with_details(json!({ "application_id": dto.application_id })));
            }
        }

        let Some(role) = role else {
            return Err(
                AppError::bad_request(ErrorCode::RoleNotFound, "Role not found")
                    .with_details(json!({ "role_name": role_name.name() })),
            );
        };

        let user = Self::create_user(
            repository,
            credentials,
            &dto.name,
            &dto.email,
            &dto.password,
            dto.application_id,
        )
        .await?;

        if let Err(err) =
            Self::assign_role_to_user(repository, user.id, role.id, dto.application_id).await
        {
            tracing::error!(
                user_id = %user.id,
                role = %role_name,
                error = %err,
                "User created but role assignment failed; user holds no role"
            );
            return Err(AppError::internal(anyhow::anyhow!(
                "role assignment failed for user {}",
                user.id
            )));
        }

        track_user_registered(role_name.name());
        tracing::info!(user_id = %user.id, role = %role_name, "User registered");

        Ok(user)
    }
}

/// Collapses left-join rows into one identity with the union of permissions.
///
/// Identity fields come from the first row. Rows without permissions (the
/// user holds no role) contribute nothing.
pub fn aggregate_user_rows(rows: Vec<UserRoleRow>) -> Option<ResolvedUser> {
    let mut rows = rows.into_iter();
    let first = rows.next()?;

    let mut permissions: BTreeSet<String> = BTreeSet::new();
    permissions.extend(first.permissions.unwrap_or_default());
    for row in rows {
        permissions.extend(row.permissions.unwrap_or_default());
    }

    Some(ResolvedUser {
        id: first.id,
        email: first.email,
        name: first.name,
        application_id: first.application_id,
        password_digest: first.password_digest,
        permissions: permissions.into_iter().collect(),
    })
}
