use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    BookAppointmentRequest, BookDiagnosticRequest, BookingError, BookingKind,
    BookingSearchParams, UpdateBookingRequest,
};
use crate::services::{BookingLedger, BookingService};

fn map_error(err: BookingError) -> AppError {
    match err {
        BookingError::SlotTaken => AppError::BadRequest("This slot is already booked".to_string()),
        BookingError::ProviderNotFound(_) => AppError::NotFound(err.to_string()),
        BookingError::NotFound => AppError::NotFound(err.to_string()),
        BookingError::InvalidDateTime(msg) => AppError::ValidationError(msg),
        BookingError::InvalidStatusTransition { .. } => AppError::BadRequest(err.to_string()),
        BookingError::Schedule(msg) => AppError::Internal(msg),
        BookingError::Database(msg) => AppError::Database(msg),
    }
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
}

/// GET /available-slots/{provider_id}?date=YYYY-MM-DD
pub async fn available_slots(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d").map_err(|_| {
        AppError::ValidationError("Invalid date format. Use YYYY-MM-DD".to_string())
    })?;

    let service = BookingService::new(&state);
    let payload = service
        .list_availability(provider_id, date)
        .await
        .map_err(map_error)?;

    Ok(Json(payload))
}

pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = BookingService::new(&state);
    let confirmation = service.book_appointment(request).await.map_err(map_error)?;

    Ok((StatusCode::CREATED, Json(json!(confirmation))))
}

pub async fn book_diagnostic(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<BookDiagnosticRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = BookingService::new(&state);
    let confirmation = service.book_diagnostic(request).await.map_err(map_error)?;

    Ok((StatusCode::CREATED, Json(json!(confirmation))))
}

pub async fn list_bookings(
    State(state): State<Arc<AppConfig>>,
    Extension(kind): Extension<BookingKind>,
    Query(params): Query<BookingSearchParams>,
) -> Result<Json<Value>, AppError> {
    let ledger = BookingLedger::new(&state);
    let bookings = ledger.list(kind, &params).await.map_err(map_error)?;

    Ok(Json(json!(bookings)))
}

pub async fn get_booking(
    State(state): State<Arc<AppConfig>>,
    Extension(kind): Extension<BookingKind>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let ledger = BookingLedger::new(&state);
    let booking = ledger.get(kind, booking_id).await.map_err(map_error)?;

    Ok(Json(json!(booking)))
}

pub async fn update_booking(
    State(state): State<Arc<AppConfig>>,
    Extension(kind): Extension<BookingKind>,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let ledger = BookingLedger::new(&state);
    let booking = ledger.update(kind, booking_id, request).await.map_err(map_error)?;

    Ok(Json(json!(booking)))
}

/// DELETE on a booking is a cancellation, freeing the slot for re-booking.
pub async fn cancel_booking(
    State(state): State<Arc<AppConfig>>,
    Extension(kind): Extension<BookingKind>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let ledger = BookingLedger::new(&state);
    ledger.cancel(kind, booking_id).await.map_err(map_error)?;

    Ok(Json(json!({ "message": "Booking cancelled" })))
}
