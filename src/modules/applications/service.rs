//! Application (tenant) bootstrap.

use gatekeep_core::{AppError, ErrorCode, PermissionRegistry, SystemRole};
use gatekeep_db::TenantRepository;
use gatekeep_models::{Application, ProvisionedApplication, Role};
use gatekeep_observability::track_application_bootstrapped;
use serde_json::json;
use tracing::instrument;

use crate::modules::roles::service as role_service;

#[instrument(skip(repository))]
pub async fn get_applications(
    repository: &dyn TenantRepository,
) -> Result<Vec<Application>, AppError> {
    Ok(repository.list_applications().await?)
}

/// Creates an application and provisions its two system roles.
///
/// Both role creations run concurrently and are awaited to completion, so a
/// failure of one never cancels the other. Nothing is rolled back: if either
/// role fails the application stays, with whichever role did succeed, and the
/// error names every failed role. A failed `SUPER_ADMIN` role determines the
/// error code when both fail.
#[instrument(skip(repository, registry))]
pub async fn bootstrap_application(
    repository: &dyn TenantRepository,
    registry: &PermissionRegistry,
    name: &str,
) -> Result<ProvisionedApplication, AppError> {
    let application = repository.create_application(name).await?;

    let provision = |role: SystemRole| {
        role_service::create_role(
            repository,
            registry,
            role.name(),
            application.id,
            registry.permissions_for(role),
        )
    };

    let (super_admin_role, application_user_role) = tokio::join!(
        provision(SystemRole::SuperAdmin),
        provision(SystemRole::ApplicationUser)
    );

    match (super_admin_role, application_user_role) {
        (Ok(super_admin_role), Ok(application_user_role)) => {
            track_application_bootstrapped("success");
            tracing::info!(application_id = %application.id, "Application bootstrapped");
            Ok(ProvisionedApplication {
                application,
                super_admin_role,
                application_user_role,
            })
        }
        (super_admin_role, application_user_role) => {
            let outcomes = [
                (SystemRole::SuperAdmin, super_admin_role),
                (SystemRole::ApplicationUser, application_user_role),
            ];

            let mut failed_roles = Vec::new();
            let mut provisioned_roles: Vec<Role> = Vec::new();
            for (role, outcome) in outcomes {
                match outcome {
                    Ok(created) => provisioned_roles.push(created),
                    Err(err) => {
                        tracing::error!(
                            application_id = %application.id,
                            role = %role,
                            error = %err,
                            "System role creation failed"
                        );
                        failed_roles.push(role);
                    }
                }
            }

            track_application_bootstrapped(if provisioned_roles.is_empty() {
                "failed"
            } else {
                "partial"
            });

            let (code, message) = if failed_roles.contains(&SystemRole::SuperAdmin) {
                (
                    ErrorCode::SuperAdminRoleCreationFailed,
                    "Error creating super admin role",
                )
            } else {
                (
                    ErrorCode::ApplicationUserRoleCreationFailed,
                    "Error creating application user role",
                )
            };

            Err(AppError::new(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                code,
                anyhow::anyhow!(message),
            )
            .with_details(json!({
                "application_id": application.id,
                "failed_roles": failed_roles,
                "provisioned_roles": provisioned_roles,
            })))
        }
    }
}
