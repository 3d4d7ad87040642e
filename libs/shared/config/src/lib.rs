use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub mail_relay_url: String,
    pub facility_name: String,
    pub facility_phone: String,
    pub facility_email: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            // Empty means confirmation emails are logged instead of sent
            mail_relay_url: env::var("MAIL_RELAY_URL").unwrap_or_default(),
            facility_name: env::var("FACILITY_NAME")
                .unwrap_or_else(|_| "Sadiqabad Medical Complex".to_string()),
            facility_phone: env::var("FACILITY_PHONE")
                .unwrap_or_else(|_| "+92-300-1234567".to_string()),
            facility_email: env::var("FACILITY_EMAIL")
                .unwrap_or_else(|_| "info@sadiqabadmedical.com".to_string()),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
    }

    pub fn is_mail_configured(&self) -> bool {
        !self.mail_relay_url.is_empty()
    }
}
