use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{CatalogError, DiagnosticCategory, DiagnosticTest, Doctor, Specialty};

/// Read surface over the provider directory. The booking core only consumes
/// name lookups from here; everything else is display data.
pub struct CatalogService {
    supabase: SupabaseClient,
}

impl CatalogService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_specialties(&self) -> Result<Vec<Specialty>, CatalogError> {
        self.supabase
            .request(Method::GET, "/rest/v1/specialties?active=eq.true&order=name.asc", None)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))
    }

    pub async fn list_doctors(
        &self,
        specialty_id: Option<Uuid>,
    ) -> Result<Vec<Doctor>, CatalogError> {
        let mut path = "/rest/v1/doctors?active=eq.true&order=name.asc".to_string();
        if let Some(specialty_id) = specialty_id {
            path.push_str(&format!("&specialty_id=eq.{}", specialty_id));
        }

        self.supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, CatalogError> {
        debug!("Fetching doctor {}", doctor_id);

        let path = format!("/rest/v1/doctors?id=eq.{}&active=eq.true", doctor_id);
        let result: Vec<Doctor> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        result.into_iter().next().ok_or(CatalogError::DoctorNotFound)
    }

    pub async fn list_tests(
        &self,
        category: Option<DiagnosticCategory>,
        search: Option<&str>,
    ) -> Result<Vec<DiagnosticTest>, CatalogError> {
        let mut path = "/rest/v1/diagnostic_tests?active=eq.true&order=name.asc".to_string();
        if let Some(category) = category {
            let tag = serde_json::to_value(category)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            path.push_str(&format!("&category=eq.{}", tag));
        }
        if let Some(search) = search {
            path.push_str(&format!("&name=ilike.*{}*", search));
        }

        self.supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))
    }

    pub async fn get_test(&self, test_id: Uuid) -> Result<DiagnosticTest, CatalogError> {
        debug!("Fetching diagnostic test {}", test_id);

        let path = format!("/rest/v1/diagnostic_tests?id=eq.{}&active=eq.true", test_id);
        let result: Vec<DiagnosticTest> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        result.into_iter().next().ok_or(CatalogError::TestNotFound)
    }
}
