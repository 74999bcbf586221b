use axum::{Json, extract::State, http::StatusCode};
use gatekeep_core::AppError;
use gatekeep_core::errors::ErrorResponse;
use gatekeep_models::{CreateRoleDto, PermissionsResponse, Role};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service;

/// Create a custom role in the caller's application
#[utoipa::path(
    post,
    path = "/api/roles",
    request_body = CreateRoleDto,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 400, description = "Unknown permission", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Role name already taken", body = ErrorResponse)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user), fields(application_id = %auth_user.application_id()))]
pub async fn create_role(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateRoleDto>,
) -> Result<(StatusCode, Json<Role>), AppError> {
    let role = service::create_role(
        state.repository.as_ref(),
        &state.registry,
        &dto.name,
        auth_user.application_id(),
        dto.permissions,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(role)))
}

/// List the roles of the caller's application
#[utoipa::path(
    get,
    path = "/api/roles",
    responses(
        (status = 200, description = "Roles of the caller's application", body = Vec<Role>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_roles(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Role>>, AppError> {
    let roles = service::get_roles(state.repository.as_ref(), auth_user.application_id()).await?;
    Ok(Json(roles))
}

/// Describe the permission registry
#[utoipa::path(
    get,
    path = "/api/permissions",
    responses(
        (status = 200, description = "Registered permissions and system roles", body = PermissionsResponse)
    ),
    tag = "Roles"
)]
pub async fn get_permissions(State(state): State<AppState>) -> Json<PermissionsResponse> {
    Json(service::describe_registry(&state.registry))
}
