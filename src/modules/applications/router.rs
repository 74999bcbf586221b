use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{create_application, get_applications};

pub fn init_applications_router() -> Router<AppState> {
    Router::new().route("/", post(create_application).get(get_applications))
}
