use axum::{Json, extract::State, http::StatusCode};
use gatekeep_core::AppError;
use gatekeep_core::errors::ErrorResponse;
use gatekeep_models::{AssignRoleToUserDto, CreateUserDto, MeResponse, RoleAssignment, User};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::UserService;

/// Register a user in an application
///
/// With `initial_user` the user becomes the application's super admin; this
/// is only allowed while the application has no users.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Super admin already exists or role missing", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = UserService::register(state.repository.as_ref(), state.credentials.as_ref(), dto)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Assign a role to a user of the caller's application
#[utoipa::path(
    post,
    path = "/api/users/roles",
    request_body = AssignRoleToUserDto,
    responses(
        (status = 201, description = "Role assigned", body = RoleAssignment),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User or role not in this application", body = ErrorResponse),
        (status = 409, description = "Role already assigned", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn assign_role_to_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<AssignRoleToUserDto>,
) -> Result<(StatusCode, Json<RoleAssignment>), AppError> {
    let assignment = UserService::assign_role_to_user(
        state.repository.as_ref(),
        dto.user_id,
        dto.role_id,
        auth_user.application_id(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Identity and scopes carried by the caller's token
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current identity", body = MeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn get_me(auth_user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse::from(auth_user.0))
}
