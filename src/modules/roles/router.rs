use axum::{
    Router,
    extract::Request,
    handler::Handler,
    middleware::{self, Next},
    routing::{get, post},
};
use gatekeep_core::permissions::ROLES_WRITE;

use crate::middleware::auth::require_scopes;
use crate::state::AppState;

use super::controller::{create_role, get_permissions, get_roles};

pub fn init_roles_router() -> Router<AppState> {
    Router::new().route(
        "/",
        post(create_role.layer(middleware::from_fn(|req: Request, next: Next| {
            require_scopes(&[ROLES_WRITE], req, next)
        })))
        .get(get_roles.layer(middleware::from_fn(|req: Request, next: Next| {
            require_scopes(&[], req, next)
        }))),
    )
}

pub fn init_permissions_router() -> Router<AppState> {
    Router::new().route("/", get(get_permissions))
}
