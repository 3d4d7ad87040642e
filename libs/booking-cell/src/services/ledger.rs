use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{DbError, SupabaseClient};

use crate::models::{
    generate_reference_number, parse_booking_datetime, Booking, BookingError, BookingKind,
    BookingSearchParams, BookingStatus, PatientDetails, UpdateBookingRequest,
};

/// The set of non-cancelled bookings per provider, and the single mutation
/// path into it.
///
/// Correctness rests on the store, not on this code: the bookings table has a
/// partial unique index on (provider_id, date_time) restricted to active
/// statuses, so reserve is one atomic check-then-insert no matter how many
/// requests race. `taken_timestamps` is advisory only.
pub struct BookingLedger {
    supabase: SupabaseClient,
}

#[derive(Debug, Deserialize)]
struct TakenRow {
    date_time: NaiveDateTime,
}

impl BookingLedger {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Timestamps currently held by active bookings of any kind for this
    /// provider on the given date. Half-open day range, [00:00, next 00:00).
    pub async fn taken_timestamps(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<HashSet<NaiveDateTime>, BookingError> {
        let day_start = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        let next_day = day_start + Duration::days(1);

        let path = format!(
            "/rest/v1/bookings?provider_id=eq.{}&date_time=gte.{}&date_time=lt.{}&status=in.(new,confirmed)&select=date_time",
            provider_id,
            day_start.format("%Y-%m-%dT%H:%M:%S"),
            next_day.format("%Y-%m-%dT%H:%M:%S"),
        );

        let rows: Vec<TakenRow> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|row| row.date_time).collect())
    }

    /// Atomically reserve one slot. The insert either lands (no active
    /// booking held the timestamp) or the store answers 409 and the caller
    /// gets `SlotTaken`; there is no read-then-write window. Never retried
    /// here: the patient must pick a different slot.
    pub async fn reserve(
        &self,
        kind: BookingKind,
        provider_id: Uuid,
        date_time: NaiveDateTime,
        details: PatientDetails,
    ) -> Result<Booking, BookingError> {
        let reference_number = generate_reference_number(kind);
        debug!(
            "Reserving {} slot {} for provider {} ({})",
            kind, date_time, provider_id, reference_number
        );

        let booking_data = json!({
            "id": Uuid::new_v4(),
            "reference_number": reference_number,
            "kind": kind,
            "provider_id": provider_id,
            "date_time": date_time.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "patient_name": details.patient_name,
            "patient_phone": details.patient_phone,
            "patient_email": details.patient_email,
            "patient_gender": details.patient_gender,
            "patient_dob": details.patient_dob,
            "status": BookingStatus::New,
            "notes": details.notes,
            "created_at": Utc::now().to_rfc3339(),
        });

        let result: Vec<Booking> = self
            .supabase
            .insert_returning("/rest/v1/bookings", booking_data)
            .await
            .map_err(|e| match e {
                DbError::Conflict(detail) => {
                    warn!(
                        "Slot conflict for provider {} at {}: {}",
                        provider_id, date_time, detail
                    );
                    BookingError::SlotTaken
                }
                other => BookingError::Database(other.to_string()),
            })?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| BookingError::Database("Insert returned no booking".to_string()))
    }

    pub async fn get(&self, kind: BookingKind, booking_id: Uuid) -> Result<Booking, BookingError> {
        let path = format!("/rest/v1/bookings?id=eq.{}&kind=eq.{}", booking_id, kind);
        let result: Vec<Booking> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        result.into_iter().next().ok_or(BookingError::NotFound)
    }

    pub async fn list(
        &self,
        kind: BookingKind,
        params: &BookingSearchParams,
    ) -> Result<Vec<Booking>, BookingError> {
        let mut path = format!("/rest/v1/bookings?kind=eq.{}&order=date_time.desc", kind);

        if let Some(provider_id) = params.provider_id {
            path.push_str(&format!("&provider_id=eq.{}", provider_id));
        }
        if let Some(status) = params.status {
            path.push_str(&format!("&status=eq.{}", status));
        }
        if let Some(date) = params.date {
            let day_start = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
            let next_day = day_start + Duration::days(1);
            path.push_str(&format!(
                "&date_time=gte.{}&date_time=lt.{}",
                day_start.format("%Y-%m-%dT%H:%M:%S"),
                next_day.format("%Y-%m-%dT%H:%M:%S"),
            ));
        }

        self.supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))
    }

    /// Allow-listed patch of one booking. Status changes must follow the
    /// lifecycle; a date_time change re-enters the same store constraint as
    /// reserve, so it cannot sidestep the conflict check.
    pub async fn update(
        &self,
        kind: BookingKind,
        booking_id: Uuid,
        request: UpdateBookingRequest,
    ) -> Result<Booking, BookingError> {
        let current = self.get(kind, booking_id).await?;

        let mut update_data = serde_json::Map::new();

        if let Some(status) = request.status {
            if !current.status.can_transition_to(status) {
                return Err(BookingError::InvalidStatusTransition {
                    from: current.status,
                    to: status,
                });
            }
            update_data.insert("status".to_string(), json!(status));
        }
        if let Some(notes) = request.notes {
            update_data.insert("notes".to_string(), json!(notes));
        }
        if let Some(raw) = request.date_time {
            let date_time = parse_booking_datetime(&raw)?;
            update_data.insert(
                "date_time".to_string(),
                json!(date_time.format("%Y-%m-%dT%H:%M:%S").to_string()),
            );
        }

        if update_data.is_empty() {
            return Ok(current);
        }

        let path = format!("/rest/v1/bookings?id=eq.{}&kind=eq.{}", booking_id, kind);
        let result: Vec<Booking> = self
            .supabase
            .update_returning(&path, Value::Object(update_data))
            .await
            .map_err(|e| match e {
                DbError::Conflict(_) => BookingError::SlotTaken,
                other => BookingError::Database(other.to_string()),
            })?;

        result.into_iter().next().ok_or(BookingError::NotFound)
    }

    /// Cancelling frees the slot for re-booking; terminal bookings stay put.
    pub async fn cancel(&self, kind: BookingKind, booking_id: Uuid) -> Result<Booking, BookingError> {
        self.update(
            kind,
            booking_id,
            UpdateBookingRequest {
                status: Some(BookingStatus::Cancelled),
                ..Default::default()
            },
        )
        .await
    }
}
