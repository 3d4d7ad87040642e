use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Patients share the directory's gender vocabulary
pub use catalog_cell::models::Gender;

// ==============================================================================
// CORE BOOKING MODELS
// ==============================================================================

/// Which side of the facility a booking belongs to. Drives the reference
/// prefix and the provider lookup (doctor vs diagnostic test).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingKind {
    Appointment,
    Diagnostic,
}

impl BookingKind {
    pub fn reference_prefix(&self) -> &'static str {
        match self {
            BookingKind::Appointment => "APT",
            BookingKind::Diagnostic => "DGN",
        }
    }
}

impl fmt::Display for BookingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingKind::Appointment => write!(f, "appointment"),
            BookingKind::Diagnostic => write!(f, "diagnostic"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    New,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Active bookings hold their slot; cancelled and no-show free it.
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::New | BookingStatus::Confirmed)
    }

    /// new -> confirmed -> completed, with cancelled/no_show as terminal
    /// alternatives out of new or confirmed. Terminal states never move.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        match (self, next) {
            (BookingStatus::New, BookingStatus::Confirmed)
            | (BookingStatus::New, BookingStatus::Cancelled)
            | (BookingStatus::New, BookingStatus::NoShow)
            | (BookingStatus::Confirmed, BookingStatus::Completed)
            | (BookingStatus::Confirmed, BookingStatus::Cancelled)
            | (BookingStatus::Confirmed, BookingStatus::NoShow) => true,
            _ => false,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::New => write!(f, "new"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::NoShow => write!(f, "no_show"),
        }
    }
}

/// A confirmed reservation of one slot. `date_time` is facility-local and
/// naive; the uniqueness invariant is per (provider_id, date_time) over
/// active statuses, enforced by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub reference_number: String,
    pub kind: BookingKind,
    pub provider_id: Uuid,
    pub date_time: NaiveDateTime,
    pub patient_name: String,
    pub patient_phone: String,
    pub patient_email: Option<String>,
    pub patient_gender: Option<Gender>,
    pub patient_dob: Option<NaiveDate>,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Patient identity fields shared by both booking endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientDetails {
    pub patient_name: String,
    pub patient_phone: String,
    pub patient_email: Option<String>,
    pub patient_gender: Option<Gender>,
    pub patient_dob: Option<NaiveDate>,
    pub notes: Option<String>,
}

// ==============================================================================
// REQUEST / RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    /// "YYYY-MM-DD HH:MM" (ISO `T` separator also accepted)
    pub date_time: String,
    pub patient_name: String,
    pub patient_phone: String,
    pub patient_email: Option<String>,
    pub patient_gender: Option<Gender>,
    pub patient_dob: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDiagnosticRequest {
    pub test_id: Uuid,
    pub date_time: String,
    pub patient_name: String,
    pub patient_phone: String,
    pub patient_email: Option<String>,
    pub patient_gender: Option<Gender>,
    pub patient_dob: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Allow-listed patch: exactly the mutable fields of a booking. A `date_time`
/// change re-enters the conflict check; everything else bypasses it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookingRequest {
    pub status: Option<BookingStatus>,
    pub notes: Option<String>,
    pub date_time: Option<String>,
}

/// Caller-displayable confirmation payload returned by the booking endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub message: String,
    pub id: Uuid,
    pub reference_number: String,
    pub whatsapp_template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation: Option<String>,
}

/// Filters for the administrative booking listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingSearchParams {
    pub provider_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
    pub date: Option<NaiveDate>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("This slot is already booked")]
    SlotTaken,

    #[error("{0} not found")]
    ProviderNotFound(&'static str),

    #[error("Booking not found")]
    NotFound,

    #[error("Invalid date_time: {0}")]
    InvalidDateTime(String),

    #[error("Cannot move booking from {from} to {to}")]
    InvalidStatusTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Schedule error: {0}")]
    Schedule(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Parse the wire format used by the booking endpoints. The primary form is
/// "YYYY-MM-DD HH:MM"; ISO variants with a `T` separator and explicit seconds
/// are tolerated.
pub fn parse_booking_datetime(raw: &str) -> Result<NaiveDateTime, BookingError> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| {
            BookingError::InvalidDateTime(format!(
                "'{}' is not a valid booking time, expected YYYY-MM-DD HH:MM",
                raw
            ))
        })
}

/// Reference numbers are human-facing: a kind tag plus 8 uppercase hex
/// characters from a fresh v4 uuid. Globally unique for all practical
/// purposes; the store's unique column backs it up.
pub fn generate_reference_number(kind: BookingKind) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("{}-{}", kind.reference_prefix(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn active_statuses_hold_their_slot() {
        assert!(BookingStatus::New.is_active());
        assert!(BookingStatus::Confirmed.is_active());
        assert!(!BookingStatus::Completed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
        assert!(!BookingStatus::NoShow.is_active());
    }

    #[test]
    fn lifecycle_moves_forward_only() {
        assert!(BookingStatus::New.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Completed));
        assert!(BookingStatus::New.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::NoShow));

        assert!(!BookingStatus::New.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::New));
        assert!(!BookingStatus::NoShow.can_transition_to(BookingStatus::Confirmed));
    }

    #[test]
    fn reference_numbers_carry_the_kind_tag() {
        let apt = generate_reference_number(BookingKind::Appointment);
        let dgn = generate_reference_number(BookingKind::Diagnostic);

        assert!(apt.starts_with("APT-"));
        assert!(dgn.starts_with("DGN-"));
        assert_eq!(apt.len(), 12);
        assert!(apt[4..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn booking_datetime_accepts_space_and_t_separators() {
        let a = parse_booking_datetime("2025-01-20 09:00").unwrap();
        let b = parse_booking_datetime("2025-01-20T09:00:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_datetime_is_rejected() {
        assert_matches!(
            parse_booking_datetime("20-01-2025 09:00"),
            Err(BookingError::InvalidDateTime(_))
        );
        assert_matches!(
            parse_booking_datetime("not a date"),
            Err(BookingError::InvalidDateTime(_))
        );
    }
}
