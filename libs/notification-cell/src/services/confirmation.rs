use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

use shared_config::AppConfig;

use crate::models::{BookingNotice, NoticeKind};

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Mail relay error ({status}): {message}")]
    Relay { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Generate the WhatsApp message staff forward to the patient.
pub fn whatsapp_template(notice: &BookingNotice, config: &AppConfig) -> String {
    match notice.kind {
        NoticeKind::Appointment => format!(
            "Dear {}, your appointment at {} is confirmed.\n\n\
             Ref: {}\nDoctor: {}\nDate/Time: {}\n\n\
             Please arrive 15 mins early. For queries: {}",
            notice.patient_name,
            config.facility_name,
            notice.reference_number,
            notice.service_name,
            notice.date_time,
            config.facility_phone,
        ),
        NoticeKind::Diagnostic => format!(
            "Dear {}, your diagnostic test at {} is confirmed.\n\n\
             Ref: {}\nTest: {}\nDate/Time: {}\n\n\
             For queries: {}",
            notice.patient_name,
            config.facility_name,
            notice.reference_number,
            notice.service_name,
            notice.date_time,
            config.facility_phone,
        ),
    }
}

pub fn email_subject(notice: &BookingNotice, config: &AppConfig) -> String {
    format!(
        "Booking Confirmation - {} | {}",
        notice.reference_number, config.facility_name
    )
}

pub fn email_body(notice: &BookingNotice, config: &AppConfig) -> String {
    let (thanks_line, closing_line) = match notice.kind {
        NoticeKind::Appointment => (
            "Thank you for booking an appointment at",
            "Please arrive 15 minutes before your scheduled appointment.",
        ),
        NoticeKind::Diagnostic => (
            "Thank you for booking a diagnostic test at",
            "Please follow any preparation instructions provided for your test.",
        ),
    };
    let service_label = match notice.kind {
        NoticeKind::Appointment => "Doctor",
        NoticeKind::Diagnostic => "Test",
    };

    format!(
        "Dear {},\n\n\
         {} {}.\n\n\
         Booking Details:\n\
         - Reference Number: {}\n\
         - {}: {}\n\
         - Date & Time: {}\n\
         {}\n\
         {}\n\n\
         For any queries, please contact us:\n\
         Phone: {}\n\
         Email: {}\n\n\
         Best regards,\n\
         {}\n",
        notice.patient_name,
        thanks_line,
        config.facility_name,
        notice.reference_number,
        service_label,
        notice.service_name,
        notice.date_time,
        notice.extra_info,
        closing_line,
        config.facility_phone,
        config.facility_email,
        config.facility_name,
    )
}

/// Delivers confirmation emails through an HTTP mail relay. Delivery is
/// best-effort by contract: callers log failures and carry on, a booking is
/// never rolled back because a notification bounced.
pub struct ConfirmationSender {
    client: Client,
    config: AppConfig,
}

impl ConfirmationSender {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    pub async fn send(&self, to_email: &str, notice: &BookingNotice) -> Result<(), NotifyError> {
        if !self.config.is_mail_configured() {
            info!(
                "Mail relay not configured, skipping confirmation email to {} (ref {})",
                to_email, notice.reference_number
            );
            return Ok(());
        }

        let payload = json!({
            "to": to_email,
            "from": self.config.facility_email,
            "subject": email_subject(notice, &self.config),
            "body": email_body(notice, &self.config),
        });

        debug!("Sending confirmation email to {}", to_email);

        let response = self
            .client
            .post(&self.config.mail_relay_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::Relay {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
