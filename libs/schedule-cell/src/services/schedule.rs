use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    CreateExceptionRequest, CreateWindowRequest, ScheduleError, ScheduleException,
    UpdateWindowRequest, WeeklyScheduleWindow,
};

/// Administration of weekly windows and per-date exceptions. Read-only to the
/// slot generator; all write paths validate here.
pub struct ScheduleService {
    supabase: SupabaseClient,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn create_window(
        &self,
        request: CreateWindowRequest,
    ) -> Result<WeeklyScheduleWindow, ScheduleError> {
        debug!(
            "Creating weekly window for provider {} on day {}",
            request.provider_id, request.day_of_week
        );

        if request.start_time >= request.end_time {
            return Err(ScheduleError::InvalidWindow(
                "start_time must be before end_time".to_string(),
            ));
        }
        if !(0..=6).contains(&request.day_of_week) {
            return Err(ScheduleError::InvalidWindow(
                "day_of_week must be between 0 (Monday) and 6 (Sunday)".to_string(),
            ));
        }
        if request.slot_minutes <= 0 {
            return Err(ScheduleError::InvalidWindow(
                "slot_minutes must be positive".to_string(),
            ));
        }

        // One active window per (provider, weekday); duplicates are rejected
        // at write time rather than silently resolved at read time
        if request.active {
            let path = format!(
                "/rest/v1/schedule_windows?provider_id=eq.{}&day_of_week=eq.{}&active=eq.true&select=id",
                request.provider_id, request.day_of_week
            );
            let existing: Vec<Value> = self
                .supabase
                .request(Method::GET, &path, None)
                .await
                .map_err(|e| ScheduleError::Database(e.to_string()))?;

            if !existing.is_empty() {
                return Err(ScheduleError::DuplicateWindow);
            }
        }

        let window_data = json!({
            "id": Uuid::new_v4(),
            "provider_id": request.provider_id,
            "day_of_week": request.day_of_week,
            "start_time": request.start_time.format("%H:%M:%S").to_string(),
            "end_time": request.end_time.format("%H:%M:%S").to_string(),
            "slot_minutes": request.slot_minutes,
            "active": request.active,
        });

        let result: Vec<WeeklyScheduleWindow> = self
            .supabase
            .insert_returning("/rest/v1/schedule_windows", window_data)
            .await
            .map_err(|e| ScheduleError::Database(e.to_string()))?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| ScheduleError::Database("Failed to create window".to_string()))
    }

    pub async fn list_windows(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<WeeklyScheduleWindow>, ScheduleError> {
        let path = format!(
            "/rest/v1/schedule_windows?provider_id=eq.{}&order=day_of_week.asc,start_time.asc",
            provider_id
        );

        self.supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| ScheduleError::Database(e.to_string()))
    }

    pub async fn update_window(
        &self,
        window_id: Uuid,
        request: UpdateWindowRequest,
    ) -> Result<WeeklyScheduleWindow, ScheduleError> {
        debug!("Updating weekly window {}", window_id);

        let current = self.get_window(window_id).await?;

        // Validate the window as it would look after the patch, so a
        // one-sided time change cannot invert it
        let start = request.start_time.unwrap_or(current.start_time);
        let end = request.end_time.unwrap_or(current.end_time);
        if start >= end {
            return Err(ScheduleError::InvalidWindow(
                "start_time must be before end_time".to_string(),
            ));
        }
        if let Some(slot_minutes) = request.slot_minutes {
            if slot_minutes <= 0 {
                return Err(ScheduleError::InvalidWindow(
                    "slot_minutes must be positive".to_string(),
                ));
            }
        }

        // Reactivation re-enters the one-active-window-per-weekday invariant
        if request.active == Some(true) && !current.active {
            let path = format!(
                "/rest/v1/schedule_windows?provider_id=eq.{}&day_of_week=eq.{}&active=eq.true&select=id",
                current.provider_id, current.day_of_week
            );
            let existing: Vec<Value> = self
                .supabase
                .request(Method::GET, &path, None)
                .await
                .map_err(|e| ScheduleError::Database(e.to_string()))?;

            if !existing.is_empty() {
                return Err(ScheduleError::DuplicateWindow);
            }
        }

        let mut update_data = serde_json::Map::new();
        if let Some(start_time) = request.start_time {
            update_data.insert(
                "start_time".to_string(),
                json!(start_time.format("%H:%M:%S").to_string()),
            );
        }
        if let Some(end_time) = request.end_time {
            update_data.insert(
                "end_time".to_string(),
                json!(end_time.format("%H:%M:%S").to_string()),
            );
        }
        if let Some(slot_minutes) = request.slot_minutes {
            update_data.insert("slot_minutes".to_string(), json!(slot_minutes));
        }
        if let Some(active) = request.active {
            update_data.insert("active".to_string(), json!(active));
        }

        if update_data.is_empty() {
            return Ok(current);
        }

        let path = format!("/rest/v1/schedule_windows?id=eq.{}", window_id);
        let result: Vec<WeeklyScheduleWindow> = self
            .supabase
            .update_returning(&path, Value::Object(update_data))
            .await
            .map_err(|e| ScheduleError::Database(e.to_string()))?;

        result.into_iter().next().ok_or(ScheduleError::NotFound)
    }

    async fn get_window(&self, window_id: Uuid) -> Result<WeeklyScheduleWindow, ScheduleError> {
        let path = format!("/rest/v1/schedule_windows?id=eq.{}", window_id);
        let result: Vec<WeeklyScheduleWindow> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| ScheduleError::Database(e.to_string()))?;

        result.into_iter().next().ok_or(ScheduleError::NotFound)
    }

    pub async fn delete_window(&self, window_id: Uuid) -> Result<(), ScheduleError> {
        let path = format!("/rest/v1/schedule_windows?id=eq.{}", window_id);
        let _: Vec<Value> = self
            .supabase
            .request(Method::DELETE, &path, None)
            .await
            .map_err(|e| ScheduleError::Database(e.to_string()))?;

        Ok(())
    }

    pub async fn create_exception(
        &self,
        request: CreateExceptionRequest,
    ) -> Result<ScheduleException, ScheduleError> {
        debug!(
            "Creating schedule exception for provider {} on {}",
            request.provider_id, request.date
        );

        if let (Some(start), Some(end)) = (request.custom_start_time, request.custom_end_time) {
            if start >= end {
                return Err(ScheduleError::InvalidWindow(
                    "custom_start_time must be before custom_end_time".to_string(),
                ));
            }
        }

        // At most one exception per (provider, date)
        let path = format!(
            "/rest/v1/schedule_exceptions?provider_id=eq.{}&date=eq.{}&select=id",
            request.provider_id, request.date
        );
        let existing: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| ScheduleError::Database(e.to_string()))?;

        if !existing.is_empty() {
            return Err(ScheduleError::DuplicateException);
        }

        let exception_data = json!({
            "id": Uuid::new_v4(),
            "provider_id": request.provider_id,
            "date": request.date,
            "is_available": request.is_available,
            "custom_start_time": request.custom_start_time.map(|t| t.format("%H:%M:%S").to_string()),
            "custom_end_time": request.custom_end_time.map(|t| t.format("%H:%M:%S").to_string()),
            "notes": request.notes,
        });

        let result: Vec<ScheduleException> = self
            .supabase
            .insert_returning("/rest/v1/schedule_exceptions", exception_data)
            .await
            .map_err(|e| ScheduleError::Database(e.to_string()))?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| ScheduleError::Database("Failed to create exception".to_string()))
    }

    pub async fn list_exceptions(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<ScheduleException>, ScheduleError> {
        let path = format!(
            "/rest/v1/schedule_exceptions?provider_id=eq.{}&order=date.asc",
            provider_id
        );

        self.supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| ScheduleError::Database(e.to_string()))
    }

    pub async fn delete_exception(&self, exception_id: Uuid) -> Result<(), ScheduleError> {
        let path = format!("/rest/v1/schedule_exceptions?id=eq.{}", exception_id);
        let _: Vec<Value> = self
            .supabase
            .request(Method::DELETE, &path, None)
            .await
            .map_err(|e| ScheduleError::Database(e.to_string()))?;

        Ok(())
    }
}
