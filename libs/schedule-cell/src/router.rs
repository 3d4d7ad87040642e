use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn schedule_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/windows", post(handlers::create_window))
        .route(
            "/windows/{window_id}",
            patch(handlers::update_window).delete(handlers::delete_window),
        )
        .route("/providers/{provider_id}/windows", get(handlers::list_windows))
        .route("/exceptions", post(handlers::create_exception))
        .route("/exceptions/{exception_id}", delete(handlers::delete_exception))
        .route("/providers/{provider_id}/exceptions", get(handlers::list_exceptions))
        .with_state(state)
}
