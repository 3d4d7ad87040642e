use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialty {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub specialty_id: Uuid,
    pub qualifications: String,
    pub bio: Option<String>,
    pub fee: String,
    pub tags: Vec<String>,
    pub gender: Option<Gender>,
    pub languages: Vec<String>,
    pub experience_years: Option<i32>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCategory {
    LabTests,
    Imaging,
    Cardiology,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticTest {
    pub id: Uuid,
    pub name: String,
    pub category: DiagnosticCategory,
    pub description: Option<String>,
    pub preparation: Option<String>,
    pub price: String,
    pub report_time: Option<String>,
    pub duration_minutes: Option<i32>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Test not found")]
    TestNotFound,

    #[error("Database error: {0}")]
    Database(String),
}
