use crate::docs::ApiDoc;
use crate::middleware::auth::authenticate;
use crate::modules::applications::router::init_applications_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::roles::router::{init_permissions_router, init_roles_router};
use crate::modules::users::router::init_users_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use gatekeep_config::CorsConfig;
use gatekeep_observability::{logging_middleware, metrics_middleware};
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]);

    // Credentials cannot be combined with a wildcard origin.
    if config.allows_any_origin() {
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    layer
        .allow_origin(allowed_origins)
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/applications", init_applications_router())
                .nest("/auth", init_auth_router())
                .nest("/users", init_users_router())
                .nest("/roles", init_roles_router())
                .nest("/permissions", init_permissions_router()),
        )
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state.clone())
        .layer(cors_layer(&state.cors_config))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
