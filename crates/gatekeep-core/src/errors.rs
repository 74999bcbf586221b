//! Application error type and its HTTP rendering.
//!
//! Every fallible service and handler returns [`AppError`]. An error carries the
//! HTTP status, a stable client-facing [`ErrorCode`], the underlying cause and
//! optional structured details. Internal errors never expose their cause to the
//! client; it is logged instead.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Client-facing error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    InvalidPermission,
    NotFound,
    RoleNotFound,
    Conflict,
    EmailAlreadyExists,
    RoleAlreadyExists,
    RoleAlreadyAssigned,
    ApplicationAlreadySuperUser,
    InvalidCredentials,
    Unauthorized,
    SuperAdminRoleCreationFailed,
    ApplicationUserRoleCreationFailed,
    InternalServerError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidPermission => "INVALID_PERMISSION",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::RoleNotFound => "ROLE_NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            ErrorCode::RoleAlreadyExists => "ROLE_ALREADY_EXISTS",
            ErrorCode::RoleAlreadyAssigned => "ROLE_ALREADY_ASSIGNED",
            ErrorCode::ApplicationAlreadySuperUser => "APPLICATION_ALREADY_SUPER_USER",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::SuperAdminRoleCreationFailed => "SUPER_ADMIN_ROLE_CREATION_FAILED",
            ErrorCode::ApplicationUserRoleCreationFailed => {
                "APPLICATION_USER_ROLE_CREATION_FAILED"
            }
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error body returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub error: Error,
    pub details: Option<Value>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, code: ErrorCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            code,
            error: err.into(),
            details: None,
        }
    }

    /// Attaches structured details rendered next to the error message.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            err,
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::ValidationError,
            anyhow::anyhow!(message.into()),
        )
    }

    pub fn bad_request(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            code,
            anyhow::anyhow!(message.into()),
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            anyhow::anyhow!(message.into()),
        )
    }

    pub fn conflict(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, code, anyhow::anyhow!(message.into()))
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            anyhow::anyhow!("Unauthorized"),
        )
    }

    /// The single outcome for every rejected login, whatever the reason.
    pub fn invalid_credentials() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            ErrorCode::InvalidCredentials,
            anyhow::anyhow!("Invalid credentials"),
        )
    }

    pub fn is_internal(&self) -> bool {
        self.code == ErrorCode::InternalServerError
    }

    fn client_message(&self) -> String {
        if self.is_internal() {
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.status, self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = %self.code, error = ?self.error, "Request failed");
        }

        let body = ErrorResponse {
            error: self.client_message(),
            code: self.code,
            details: self.details,
        };

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
