use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;
use crate::models::BookingKind;

pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    let appointments = Router::new()
        .route("/", post(handlers::book_appointment).get(handlers::list_bookings))
        .route(
            "/{booking_id}",
            get(handlers::get_booking)
                .patch(handlers::update_booking)
                .delete(handlers::cancel_booking),
        )
        .route("/{booking_id}/cancel", post(handlers::cancel_booking))
        .layer(Extension(BookingKind::Appointment));

    let diagnostics = Router::new()
        .route("/", post(handlers::book_diagnostic).get(handlers::list_bookings))
        .route(
            "/{booking_id}",
            get(handlers::get_booking)
                .patch(handlers::update_booking)
                .delete(handlers::cancel_booking),
        )
        .route("/{booking_id}/cancel", post(handlers::cancel_booking))
        .layer(Extension(BookingKind::Diagnostic));

    Router::new()
        .route("/available-slots/{provider_id}", get(handlers::available_slots))
        .nest("/appointments", appointments)
        .nest("/diagnostic-bookings", diagnostics)
        .with_state(state)
}
