use chrono::NaiveDate;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use catalog_cell::models::CatalogError;
use catalog_cell::services::CatalogService;
use notification_cell::models::{BookingNotice, NoticeKind};
use notification_cell::services::confirmation::{self, ConfirmationSender};
use schedule_cell::models::{AvailableSlot, DayCandidates};
use schedule_cell::services::SlotService;
use shared_config::AppConfig;

use crate::models::{
    parse_booking_datetime, BookAppointmentRequest, BookDiagnosticRequest, Booking,
    BookingConfirmation, BookingError, BookingKind, PatientDetails,
};
use crate::services::ledger::BookingLedger;

/// Orchestrates generation, ledger filtering and atomic reservation, and
/// hands confirmations to the notification side.
pub struct BookingService {
    config: AppConfig,
    slots: SlotService,
    catalog: CatalogService,
    ledger: BookingLedger,
    sender: ConfirmationSender,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            config: config.clone(),
            slots: SlotService::new(config),
            catalog: CatalogService::new(config),
            ledger: BookingLedger::new(config),
            sender: ConfirmationSender::new(config),
        }
    }

    /// Generator candidates minus the ledger's taken set, order preserved.
    /// Advisory by design: a slot shown here can be gone by the time the
    /// caller books, and the reserve path re-validates.
    pub async fn list_availability(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Value, BookingError> {
        let candidates = self
            .slots
            .candidate_slots(provider_id, date)
            .await
            .map_err(|e| match e {
                schedule_cell::models::ScheduleError::Database(msg) => BookingError::Database(msg),
                other => BookingError::Schedule(other.to_string()),
            })?;

        let starts = match candidates {
            DayCandidates::Closed(reason) => {
                return Ok(json!({ "slots": [], "message": reason.message() }));
            }
            DayCandidates::Open(starts) => starts,
        };

        let taken = self.ledger.taken_timestamps(provider_id, date).await?;

        let slots: Vec<AvailableSlot> = starts
            .into_iter()
            .filter(|start| !taken.contains(start))
            .map(AvailableSlot::from_start)
            .collect();

        debug!(
            "Provider {} has {} open slots on {}",
            provider_id,
            slots.len(),
            date
        );

        Ok(json!({ "slots": slots, "date": date }))
    }

    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<BookingConfirmation, BookingError> {
        let date_time = parse_booking_datetime(&request.date_time)?;

        let doctor = self
            .catalog
            .get_doctor(request.doctor_id)
            .await
            .map_err(map_catalog_error)?;

        let details = PatientDetails {
            patient_name: request.patient_name,
            patient_phone: request.patient_phone,
            patient_email: request.patient_email,
            patient_gender: request.patient_gender,
            patient_dob: request.patient_dob,
            notes: request.notes,
        };

        let booking = self
            .ledger
            .reserve(BookingKind::Appointment, request.doctor_id, date_time, details)
            .await?;

        let confirmation = self
            .confirm(&booking, NoticeKind::Appointment, &doctor.name, String::new())
            .await;

        Ok(BookingConfirmation {
            message: "Appointment booked successfully".to_string(),
            id: booking.id,
            reference_number: booking.reference_number,
            whatsapp_template: confirmation,
            preparation: None,
        })
    }

    pub async fn book_diagnostic(
        &self,
        request: BookDiagnosticRequest,
    ) -> Result<BookingConfirmation, BookingError> {
        let date_time = parse_booking_datetime(&request.date_time)?;

        let test = self
            .catalog
            .get_test(request.test_id)
            .await
            .map_err(map_catalog_error)?;

        let details = PatientDetails {
            patient_name: request.patient_name,
            patient_phone: request.patient_phone,
            patient_email: request.patient_email,
            patient_gender: request.patient_gender,
            patient_dob: request.patient_dob,
            notes: request.notes,
        };

        let booking = self
            .ledger
            .reserve(BookingKind::Diagnostic, request.test_id, date_time, details)
            .await?;

        let extra_info = test
            .preparation
            .as_deref()
            .map(|prep| format!("\nPreparation: {}", prep))
            .unwrap_or_default();

        let confirmation = self
            .confirm(&booking, NoticeKind::Diagnostic, &test.name, extra_info)
            .await;

        Ok(BookingConfirmation {
            message: "Test booking successful".to_string(),
            id: booking.id,
            reference_number: booking.reference_number,
            whatsapp_template: confirmation,
            // Passed through untouched so the caller can display it
            preparation: test.preparation,
        })
    }

    /// Build the WhatsApp template and fire the confirmation email. Delivery
    /// problems are logged and swallowed: a booked slot is a booked slot.
    async fn confirm(
        &self,
        booking: &Booking,
        kind: NoticeKind,
        service_name: &str,
        extra_info: String,
    ) -> String {
        let notice = BookingNotice {
            patient_name: booking.patient_name.clone(),
            kind,
            reference_number: booking.reference_number.clone(),
            date_time: booking.date_time.format("%Y-%m-%d %H:%M").to_string(),
            service_name: service_name.to_string(),
            extra_info,
        };

        if let Some(email) = &booking.patient_email {
            if let Err(e) = self.sender.send(email, &notice).await {
                warn!(
                    "Confirmation email for {} failed (booking stands): {}",
                    booking.reference_number, e
                );
            }
        }

        confirmation::whatsapp_template(&notice, &self.config)
    }
}

fn map_catalog_error(err: CatalogError) -> BookingError {
    match err {
        CatalogError::DoctorNotFound => BookingError::ProviderNotFound("Doctor"),
        CatalogError::TestNotFound => BookingError::ProviderNotFound("Test"),
        CatalogError::Database(msg) => BookingError::Database(msg),
    }
}
