use gatekeep_core::{AppError, ErrorCode, PermissionRegistry};
use gatekeep_db::TenantRepository;
use gatekeep_models::{ApplicationId, NewRole, PermissionsResponse, Role};
use tracing::instrument;

/// Persists a role after checking every permission against the registry.
///
/// Duplicate permissions are collapsed; the first occurrence keeps its place.
#[instrument(skip(repository, registry))]
pub async fn create_role(
    repository: &dyn TenantRepository,
    registry: &PermissionRegistry,
    name: &str,
    application_id: ApplicationId,
    permissions: Vec<String>,
) -> Result<Role, AppError> {
    registry
        .validate(permissions.iter().map(String::as_str))
        .map_err(|unknown| AppError::bad_request(ErrorCode::InvalidPermission, unknown.to_string()))?;

    let mut unique = Vec::with_capacity(permissions.len());
    for permission in permissions {
        if !unique.contains(&permission) {
            unique.push(permission);
        }
    }

    repository
        .create_role(NewRole {
            name: name.to_string(),
            application_id,
            permissions: unique,
        })
        .await
        .map_err(|e| {
            e.into_app_error(
                ErrorCode::RoleAlreadyExists,
                format!("Role {name} already exists in this application"),
            )
        })
}

/// Absence is a normal outcome; callers decide what a missing role means.
#[instrument(skip(repository))]
pub async fn get_role_by_name(
    repository: &dyn TenantRepository,
    name: &str,
    application_id: ApplicationId,
) -> Result<Option<Role>, AppError> {
    Ok(repository.find_role_by_name(application_id, name).await?)
}

#[instrument(skip(repository))]
pub async fn get_roles(
    repository: &dyn TenantRepository,
    application_id: ApplicationId,
) -> Result<Vec<Role>, AppError> {
    Ok(repository.list_roles(application_id).await?)
}

pub fn describe_registry(registry: &PermissionRegistry) -> PermissionsResponse {
    PermissionsResponse {
        version: registry.version(),
        permissions: registry.all().map(str::to_string).collect(),
        default_permissions: registry.defaults().map(str::to_string).collect(),
        system_roles: gatekeep_core::SystemRole::ALL.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatekeep_core::permissions::{POSTS_READ, POSTS_WRITE};
    use gatekeep_db::InMemoryTenantRepository;

    async fn setup() -> (InMemoryTenantRepository, ApplicationId) {
        let repository = InMemoryTenantRepository::new();
        let application = repository.create_application("Blog").await.unwrap();
        (repository, application.id)
    }

    #[tokio::test]
    async fn test_create_role_rejects_unknown_permission() {
        let (repository, application_id) = setup().await;
        let err = create_role(
            &repository,
            &PermissionRegistry::default(),
            "EDITOR",
            application_id,
            vec![POSTS_READ.to_string(), "posts:publish".to_string()],
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidPermission);
        assert!(repository.list_roles(application_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_role_collapses_duplicates() {
        let (repository, application_id) = setup().await;
        let role = create_role(
            &repository,
            &PermissionRegistry::default(),
            "EDITOR",
            application_id,
            vec![
                POSTS_WRITE.to_string(),
                POSTS_READ.to_string(),
                POSTS_WRITE.to_string(),
            ],
        )
        .await
        .unwrap();

        assert_eq!(role.permissions, vec![POSTS_WRITE, POSTS_READ]);
    }

    #[tokio::test]
    async fn test_duplicate_role_name_conflicts() {
        let (repository, application_id) = setup().await;
        let registry = PermissionRegistry::default();
        create_role(&repository, &registry, "EDITOR", application_id, vec![])
            .await
            .unwrap();

        let err = create_role(&repository, &registry, "EDITOR", application_id, vec![])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleAlreadyExists);
    }

    #[tokio::test]
    async fn test_get_role_by_name_is_tenant_scoped() {
        let (repository, application_id) = setup().await;
        let other = repository.create_application("Other").await.unwrap();
        create_role(
            &repository,
            &PermissionRegistry::default(),
            "EDITOR",
            application_id,
            vec![],
        )
        .await
        .unwrap();

        assert!(get_role_by_name(&repository, "EDITOR", application_id)
            .await
            .unwrap()
            .is_some());
        assert!(get_role_by_name(&repository, "EDITOR", other.id)
            .await
            .unwrap()
            .is_none());
    }
}
