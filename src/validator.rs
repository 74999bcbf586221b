use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use gatekeep_core::{AppError, ErrorCode};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

fn bad_body(message: impl Into<String>) -> AppError {
    AppError::new(
        StatusCode::BAD_REQUEST,
        ErrorCode::ValidationError,
        anyhow::anyhow!(message.into()),
    )
}

/// JSON body extractor that also runs `validator` rules.
///
/// Malformed bodies are rejected with 400, rule violations with 422; both
/// carry `VALIDATION_ERROR`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error_msg = rejection.body_text();

                if error_msg.contains("missing field") {
                    let field = error_msg
                        .split("missing field `")
                        .nth(1)
                        .and_then(|s| s.split('`').next())
                        .unwrap_or("unknown");
                    return bad_body(format!("{} is required", field));
                }

                if error_msg.contains("invalid type") || error_msg.contains("UUID") {
                    return bad_body("Invalid field type in request");
                }

                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return bad_body("Missing 'Content-Type: application/json' header");
                }

                bad_body("Invalid request body")
            })?;

        value
            .validate()
            .map_err(|errors| AppError::validation(format_errors(&errors)))?;

        Ok(ValidatedJson(value))
    }
}
