use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

/// Idempotent startup bootstrap: populates the directory and the default
/// weekly windows the first time the service runs against an empty store.
/// Gated by an emptiness check on specialties, so restarts are no-ops.
pub struct SeedService {
    supabase: SupabaseClient,
}

impl SeedService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn seed_if_empty(&self) -> Result<()> {
        let existing: Vec<Value> = self
            .supabase
            .request(Method::GET, "/rest/v1/specialties?select=id&limit=1", None)
            .await
            .context("Failed to check for existing seed data")?;

        if !existing.is_empty() {
            info!("Seed data already present, skipping bootstrap");
            return Ok(());
        }

        info!("Empty store detected, seeding initial directory data");

        let now = Utc::now().to_rfc3339();

        let specialties: Vec<(Uuid, &str, &str)> = vec![
            (Uuid::new_v4(), "Cardiology", "Heart and cardiovascular care"),
            (Uuid::new_v4(), "Neurology", "Brain and nervous system"),
            (Uuid::new_v4(), "General Medicine", "Primary and preventive care"),
            (Uuid::new_v4(), "Eye Specialist", "Ophthalmology and vision care"),
        ];

        let specialty_rows: Vec<Value> = specialties
            .iter()
            .map(|(id, name, description)| {
                json!({
                    "id": id,
                    "name": name,
                    "description": description,
                    "icon": Value::Null,
                    "active": true,
                    "created_at": now,
                })
            })
            .collect();

        let _: Vec<Value> = self
            .supabase
            .insert_returning("/rest/v1/specialties", json!(specialty_rows))
            .await
            .context("Failed to seed specialties")?;

        let doctors = vec![
            (
                Uuid::new_v4(),
                "Dr. Hassan Ali",
                specialties[0].0,
                "MBBS, MD (Cardiology)",
                "Interventional cardiologist specializing in angioplasty.",
                vec!["heart", "angioplasty"],
                8,
            ),
            (
                Uuid::new_v4(),
                "Dr. Sana Tariq",
                specialties[1].0,
                "MBBS, FCPS (Neurology)",
                "Pediatric neurologist with expertise in childhood epilepsy.",
                vec!["pediatric", "epilepsy"],
                7,
            ),
            (
                Uuid::new_v4(),
                "Dr. Zainab Hussain",
                specialties[2].0,
                "MBBS, FCPS (Medicine)",
                "General physician focused on diabetes and hypertension management.",
                vec!["diabetes", "general"],
                11,
            ),
            (
                Uuid::new_v4(),
                "Dr. Imran Sheikh",
                specialties[3].0,
                "MBBS, DOMS, FCPS",
                "Glaucoma specialist with experience in laser eye surgery.",
                vec!["glaucoma", "laser"],
                14,
            ),
        ];

        let doctor_rows: Vec<Value> = doctors
            .iter()
            .map(|(id, name, specialty_id, qualifications, bio, tags, years)| {
                json!({
                    "id": id,
                    "name": name,
                    "specialty_id": specialty_id,
                    "qualifications": qualifications,
                    "bio": bio,
                    "fee": "Call for price",
                    "tags": tags,
                    "gender": Value::Null,
                    "languages": ["Urdu", "English"],
                    "experience_years": years,
                    "active": true,
                    "created_at": now,
                })
            })
            .collect();

        let _: Vec<Value> = self
            .supabase
            .insert_returning("/rest/v1/doctors", json!(doctor_rows))
            .await
            .context("Failed to seed doctors")?;

        // Every doctor works Mon-Sat: mornings early in the week, evenings
        // later, 15-minute slots throughout
        let mut window_rows = Vec::new();
        for (doctor_id, ..) in &doctors {
            for day in 0..6 {
                let (start, end) = if day < 3 {
                    ("09:00:00", "14:00:00")
                } else {
                    ("14:00:00", "20:00:00")
                };
                window_rows.push(json!({
                    "id": Uuid::new_v4(),
                    "provider_id": doctor_id,
                    "day_of_week": day,
                    "start_time": start,
                    "end_time": end,
                    "slot_minutes": 15,
                    "active": true,
                }));
            }
        }

        let window_count = window_rows.len();
        let _: Vec<Value> = self
            .supabase
            .insert_returning("/rest/v1/schedule_windows", json!(window_rows))
            .await
            .context("Failed to seed schedule windows")?;

        let tests = vec![
            (
                "Complete Blood Count (CBC)",
                "lab_tests",
                "Comprehensive blood analysis",
                "Fasting for 8-12 hours recommended",
                "Same day",
                15,
            ),
            (
                "Lipid Profile",
                "lab_tests",
                "Cholesterol and triglycerides",
                "12 hours fasting required",
                "Same day",
                15,
            ),
            (
                "Chest X-Ray",
                "imaging",
                "X-ray imaging of chest",
                "Remove metal objects",
                "Same day",
                15,
            ),
            (
                "Ultrasound Abdomen",
                "imaging",
                "Abdominal ultrasound scan",
                "Fasting for 6 hours, full bladder",
                "Same day",
                30,
            ),
            (
                "ECG (Electrocardiogram)",
                "cardiology",
                "Heart rhythm recording",
                "Relax before test",
                "Immediate",
                15,
            ),
            (
                "Treadmill Test (TMT/ETT)",
                "cardiology",
                "Exercise stress test",
                "Light meal 2 hours before, wear comfortable clothes",
                "Same day",
                60,
            ),
        ];

        let test_rows: Vec<Value> = tests
            .iter()
            .map(|(name, category, description, preparation, report_time, duration)| {
                json!({
                    "id": Uuid::new_v4(),
                    "name": name,
                    "category": category,
                    "description": description,
                    "preparation": preparation,
                    "price": "Call for price",
                    "report_time": report_time,
                    "duration_minutes": duration,
                    "active": true,
                    "created_at": now,
                })
            })
            .collect();

        let _: Vec<Value> = self
            .supabase
            .insert_returning("/rest/v1/diagnostic_tests", json!(test_rows))
            .await
            .context("Failed to seed diagnostic tests")?;

        info!(
            "Seeded {} specialties, {} doctors, {} windows, {} tests",
            specialties.len(),
            doctors.len(),
            window_count,
            tests.len()
        );

        Ok(())
    }
}
