use serde::{Deserialize, Serialize};

/// What kind of booking a notice describes; drives the template wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Appointment,
    Diagnostic,
}

/// Everything the confirmation templates need, already resolved to display
/// strings by the caller (doctor/test name, formatted date-time).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingNotice {
    pub patient_name: String,
    pub kind: NoticeKind,
    pub reference_number: String,
    pub date_time: String,
    pub service_name: String,
    #[serde(default)]
    pub extra_info: String,
}
