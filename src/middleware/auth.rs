use axum::{
    extract::{FromRequestParts, MatchedPath, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use gatekeep_auth::{Claims, verify_token};
use gatekeep_config::JwtConfig;
use gatekeep_core::AppError;
use gatekeep_models::{ApplicationId, UserId};
use gatekeep_observability::track_authorization_decision;

use crate::state::AppState;

/// Verified identity of the caller, taken from its access token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0.sub.parse().map_err(|_| AppError::unauthorized())
    }

    pub fn application_id(&self) -> ApplicationId {
        ApplicationId::from_uuid(self.0.application_id)
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn scopes(&self) -> &[String] {
        &self.0.scopes
    }
}

/// What the guard learned about the caller's credential.
#[derive(Debug, Clone)]
pub enum Authentication {
    /// No `Authorization` header.
    Anonymous,
    /// A credential was sent but could not be verified.
    Invalid,
    Authenticated(AuthUser),
}

/// Per-route outcome of checking an [`Authentication`] against required scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Authorized,
    Unauthenticated,
    Forbidden,
}

impl AccessDecision {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AccessDecision::Authorized => "authorized",
            AccessDecision::Unauthenticated => "unauthenticated",
            AccessDecision::Forbidden => "forbidden",
        }
    }
}

impl Authentication {
    pub fn from_headers(headers: &HeaderMap, jwt_config: &JwtConfig) -> Self {
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return Authentication::Anonymous;
        };

        let token = value
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim);

        match token.map(|token| verify_token(token, jwt_config)) {
            Some(Ok(claims)) => Authentication::Authenticated(AuthUser(claims)),
            _ => Authentication::Invalid,
        }
    }

    /// Every required scope must be present; an empty requirement only needs
    /// a verified caller.
    pub fn authorize(&self, required: &[&str]) -> AccessDecision {
        match self {
            Authentication::Authenticated(user) if user.0.has_all_scopes(required) => {
                AccessDecision::Authorized
            }
            Authentication::Authenticated(_) => AccessDecision::Forbidden,
            Authentication::Anonymous | Authentication::Invalid => AccessDecision::Unauthenticated,
        }
    }
}

/// Attaches an [`Authentication`] to every request. Never rejects.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let authentication = Authentication::from_headers(req.headers(), &state.jwt_config);
    if matches!(authentication, Authentication::Invalid) {
        tracing::debug!("Ignoring unverifiable bearer credential");
    }

    req.extensions_mut().insert(authentication);
    next.run(req).await
}

/// Route layer admitting only callers whose token carries every `required` scope.
pub async fn require_scopes(
    required: &'static [&'static str],
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let decision = req
        .extensions()
        .get::<Authentication>()
        .map(|authentication| authentication.authorize(required))
        .unwrap_or(AccessDecision::Unauthenticated);

    track_authorization_decision(decision.as_str());

    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    match decision {
        AccessDecision::Authorized => Ok(next.run(req).await),
        AccessDecision::Unauthenticated => {
            tracing::warn!(path = %path, ?required, "Rejected unauthenticated request");
            Err(AppError::unauthorized())
        }
        AccessDecision::Forbidden => {
            tracing::warn!(path = %path, ?required, "Rejected request lacking required scopes");
            Err(AppError::unauthorized())
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Authentication>() {
            Some(Authentication::Authenticated(user)) => Ok(user.clone()),
            _ => Err(AppError::unauthorized()),
        }
    }
}
