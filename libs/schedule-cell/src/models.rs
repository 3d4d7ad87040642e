use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// SCHEDULE MODELS
// ==============================================================================

/// Recurring weekly availability for one weekday.
///
/// `day_of_week` uses the facility's canonical ordering: Monday=0 .. Sunday=6.
/// At most one active window per (provider_id, day_of_week) is enforced at
/// write time by `ScheduleService::create_window`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyScheduleWindow {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_minutes: i32,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWindowRequest {
    pub provider_id: Uuid,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_slot_minutes() -> i32 {
    15
}

fn default_true() -> bool {
    true
}

/// Allow-listed patch for a weekly window; unknown fields are not accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWindowRequest {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub slot_minutes: Option<i32>,
    pub active: Option<bool>,
}

/// Single-date override: either a leave day (`is_available == false`) or
/// custom hours replacing the weekly window's times for that date only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleException {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub is_available: bool,
    pub custom_start_time: Option<NaiveTime>,
    pub custom_end_time: Option<NaiveTime>,
    pub notes: Option<String>,
}

/// Omitting `is_available` means the day stays open: custom hours alone must
/// shrink the day, not close it. Leave days say `false` explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExceptionRequest {
    pub provider_id: Uuid,
    pub date: NaiveDate,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub custom_start_time: Option<NaiveTime>,
    pub custom_end_time: Option<NaiveTime>,
    pub notes: Option<String>,
}

// ==============================================================================
// DERIVED SLOT MODELS (never persisted)
// ==============================================================================

/// Why a provider has no bookable slots on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedReason {
    /// A schedule exception marks the date as leave.
    Unavailable,
    /// No active weekly window exists for that weekday.
    NoSchedule,
}

impl ClosedReason {
    pub fn message(&self) -> &'static str {
        match self {
            ClosedReason::Unavailable => "Provider not available on this date",
            ClosedReason::NoSchedule => "No schedule for this day",
        }
    }
}

/// Generator output for one (provider, date) query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayCandidates {
    Closed(ClosedReason),
    Open(Vec<NaiveDateTime>),
}

/// Wire shape of one bookable slot as returned by the availability API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailableSlot {
    pub time: String,
    pub datetime: String,
}

impl AvailableSlot {
    pub fn from_start(start: NaiveDateTime) -> Self {
        Self {
            time: start.format("%H:%M").to_string(),
            datetime: start.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Invalid schedule: {0}")]
    InvalidWindow(String),

    #[error("An active window already exists for this provider and weekday")]
    DuplicateWindow,

    #[error("A schedule exception already exists for this provider and date")]
    DuplicateException,

    #[error("Schedule record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}
