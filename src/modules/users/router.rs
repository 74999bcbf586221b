use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    routing::{get, post},
};
use gatekeep_core::permissions::USERS_ROLES_WRITE;

use crate::middleware::auth::require_scopes;
use crate::state::AppState;

use super::controller::{assign_role_to_user, get_me, register_user};

pub fn init_users_router() -> Router<AppState> {
    let protected = Router::new()
        .route("/roles", post(assign_role_to_user))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_scopes(&[USERS_ROLES_WRITE], req, next)
        }))
        .merge(
            Router::new()
                .route("/me", get(get_me))
                .route_layer(middleware::from_fn(|req: Request, next: Next| {
                    require_scopes(&[], req, next)
                })),
        );

    Router::new().route("/", post(register_user)).merge(protected)
}
