use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn catalog_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/specialties", get(handlers::list_specialties))
        .route("/doctors", get(handlers::list_doctors))
        .route("/doctors/{doctor_id}", get(handlers::get_doctor))
        .route("/tests", get(handlers::list_tests))
        .route("/tests/{test_id}", get(handlers::get_test))
        .with_state(state)
}
