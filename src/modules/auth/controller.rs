use axum::{Json, extract::State};
use gatekeep_core::AppError;
use gatekeep_core::errors::ErrorResponse;
use gatekeep_models::{LoginRequest, LoginResponse};
use tracing::instrument;

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service::AuthService;

/// Login and receive an access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(
        state.repository.as_ref(),
        state.credentials.as_ref(),
        &state.jwt_config,
        dto,
    )
    .await?;
    Ok(Json(response))
}
