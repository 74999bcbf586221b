use axum::{Json, extract::State, http::StatusCode};
use gatekeep_core::AppError;
use gatekeep_core::errors::ErrorResponse;
use gatekeep_models::{Application, CreateApplicationDto, ProvisionedApplication};
use tracing::instrument;

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service;

/// Create an application with its SUPER_ADMIN and APPLICATION_USER roles
#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = CreateApplicationDto,
    responses(
        (status = 201, description = "Application and system roles created", body = ProvisionedApplication),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Application created but a system role failed", body = ErrorResponse)
    ),
    tag = "Applications"
)]
#[instrument(skip(state))]
pub async fn create_application(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateApplicationDto>,
) -> Result<(StatusCode, Json<ProvisionedApplication>), AppError> {
    let provisioned =
        service::bootstrap_application(state.repository.as_ref(), &state.registry, &dto.name)
            .await?;
    Ok((StatusCode::CREATED, Json(provisioned)))
}

/// List applications
#[utoipa::path(
    get,
    path = "/api/applications",
    responses(
        (status = 200, description = "All applications", body = Vec<Application>)
    ),
    tag = "Applications"
)]
#[instrument(skip(state))]
pub async fn get_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<Application>>, AppError> {
    let applications = service::get_applications(state.repository.as_ref()).await?;
    Ok(Json(applications))
}
