mod cache;
mod health;
mod records;
mod state;

pub use state::AdminState;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::middleware::{log_responses, set_request_context};

pub fn build_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/cache/clear", post(cache::clear_cache))
        .route("/records/{kind}/{name}/title", put(records::update_title))
        .route("/_health", get(health::admin_health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}
