//! Request-time authentication and authorization.
//!
//! # Flow
//!
//! 1. [`auth::authenticate`] runs once for every request. It reads the
//!    `Authorization: Bearer <token>` header, verifies the token and attaches
//!    an [`auth::Authentication`] to the request. It never rejects: public
//!    routes keep working with a missing or broken token.
//! 2. Protected routes carry a [`auth::require_scopes`] route layer declaring
//!    the permissions they need. Missing, invalid or insufficient credentials
//!    are all answered with the same `401 UNAUTHORIZED`.
//! 3. Handlers that need the caller identity take an [`auth::AuthUser`].
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, extract::Request, middleware::{self, Next}, routing::post};
//! use gatekeep_core::permissions::ROLES_WRITE;
//!
//! let router: Router<AppState> = Router::new()
//!     .route("/", post(create_role))
//!     .route_layer(middleware::from_fn(|req: Request, next: Next| {
//!         require_scopes(&[ROLES_WRITE], req, next)
//!     }));
//! ```

pub mod auth;
