use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    ClosedReason, DayCandidates, ScheduleError, ScheduleException, WeeklyScheduleWindow,
};

/// Weekday index in the facility's canonical ordering: Monday=0 .. Sunday=6.
/// Weekly windows and the generator both key off this.
pub fn weekday_index(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_monday() as i32
}

/// Resolve the effective hours for a date from the weekly window and an
/// optional exception.
///
/// Precedence: a leave exception closes the day outright; custom hours on an
/// available exception replace the window's start/end (each independently);
/// `slot_minutes` always comes from the window, exceptions never override it.
pub fn resolve_day(
    window: Option<&WeeklyScheduleWindow>,
    exception: Option<&ScheduleException>,
) -> Result<(NaiveTime, NaiveTime, i32), ClosedReason> {
    if let Some(exc) = exception {
        if !exc.is_available {
            return Err(ClosedReason::Unavailable);
        }
    }

    let window = window.ok_or(ClosedReason::NoSchedule)?;

    let start = exception
        .and_then(|exc| exc.custom_start_time)
        .unwrap_or(window.start_time);
    let end = exception
        .and_then(|exc| exc.custom_end_time)
        .unwrap_or(window.end_time);

    Ok((start, end, window.slot_minutes))
}

/// Walk the day in `slot_minutes` steps from `start`, emitting every slot
/// whose start falls strictly before `end`. The last slot may overrun the
/// window end: a slot starting before closing time is valid.
pub fn enumerate_slots(
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    slot_minutes: i32,
) -> Vec<NaiveDateTime> {
    if slot_minutes <= 0 {
        return Vec::new();
    }

    let end_at = date.and_time(end);
    let step = Duration::minutes(slot_minutes as i64);

    let mut slots = Vec::new();
    let mut current = date.and_time(start);
    while current < end_at {
        slots.push(current);
        current += step;
    }

    slots
}

/// Pure slot generation over the schedule store. Deterministic and free of
/// side effects; callers may invoke it concurrently and repeatedly.
pub struct SlotService {
    supabase: SupabaseClient,
}

impl SlotService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Candidate slot start-times for (provider, date), before the booking
    /// ledger filters out taken timestamps.
    pub async fn candidate_slots(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<DayCandidates, ScheduleError> {
        debug!("Generating candidate slots for provider {} on {}", provider_id, date);

        let exception = self.find_exception(provider_id, date).await?;

        // A leave exception short-circuits before any window lookup
        if let Some(exc) = &exception {
            if !exc.is_available {
                return Ok(DayCandidates::Closed(ClosedReason::Unavailable));
            }
        }

        let window = self.find_active_window(provider_id, weekday_index(date)).await?;

        match resolve_day(window.as_ref(), exception.as_ref()) {
            Ok((start, end, slot_minutes)) => {
                Ok(DayCandidates::Open(enumerate_slots(date, start, end, slot_minutes)))
            }
            Err(reason) => Ok(DayCandidates::Closed(reason)),
        }
    }

    async fn find_exception(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<ScheduleException>, ScheduleError> {
        let path = format!(
            "/rest/v1/schedule_exceptions?provider_id=eq.{}&date=eq.{}",
            provider_id, date
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| ScheduleError::Database(e.to_string()))?;

        // At most one exception per (provider, date) is enforced at write time
        result
            .into_iter()
            .next()
            .map(|exc| serde_json::from_value(exc))
            .transpose()
            .map_err(|e| ScheduleError::Database(format!("Failed to parse exception: {}", e)))
    }

    async fn find_active_window(
        &self,
        provider_id: Uuid,
        day_of_week: i32,
    ) -> Result<Option<WeeklyScheduleWindow>, ScheduleError> {
        let path = format!(
            "/rest/v1/schedule_windows?provider_id=eq.{}&day_of_week=eq.{}&active=eq.true&order=start_time.asc",
            provider_id, day_of_week
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| ScheduleError::Database(e.to_string()))?;

        result
            .into_iter()
            .next()
            .map(|win| serde_json::from_value(win))
            .transpose()
            .map_err(|e| ScheduleError::Database(format!("Failed to parse window: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: &str, end: &str, slot_minutes: i32) -> WeeklyScheduleWindow {
        WeeklyScheduleWindow {
            id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            day_of_week: 0,
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            slot_minutes,
            active: true,
        }
    }

    fn leave_exception() -> ScheduleException {
        ScheduleException {
            id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
            is_available: false,
            custom_start_time: None,
            custom_end_time: None,
            notes: Some("Annual leave".to_string()),
        }
    }

    #[test]
    fn monday_is_day_zero() {
        // 2025-01-20 is a Monday
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()), 0);
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2025, 1, 26).unwrap()), 6);
    }

    #[test]
    fn five_hour_window_at_fifteen_minutes_yields_twenty_slots() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let slots = enumerate_slots(
            date,
            "09:00".parse().unwrap(),
            "14:00".parse().unwrap(),
            15,
        );

        assert_eq!(slots.len(), 20);
        assert_eq!(slots[0].format("%H:%M").to_string(), "09:00");
        assert_eq!(slots[19].format("%H:%M").to_string(), "13:45");
    }

    #[test]
    fn slot_starting_before_close_is_kept_even_if_it_overruns() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        // 09:00-09:50 at 20-minute slots: 09:40 starts before close, ends after
        let slots = enumerate_slots(
            date,
            "09:00".parse().unwrap(),
            "09:50".parse().unwrap(),
            20,
        );

        let times: Vec<String> = slots.iter().map(|s| s.format("%H:%M").to_string()).collect();
        assert_eq!(times, vec!["09:00", "09:20", "09:40"]);
    }

    #[test]
    fn enumeration_is_deterministic() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let start: NaiveTime = "14:00".parse().unwrap();
        let end: NaiveTime = "20:00".parse().unwrap();

        assert_eq!(
            enumerate_slots(date, start, end, 15),
            enumerate_slots(date, start, end, 15)
        );
    }

    #[test]
    fn nonpositive_slot_minutes_yields_nothing() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        assert!(enumerate_slots(date, "09:00".parse().unwrap(), "14:00".parse().unwrap(), 0).is_empty());
    }

    #[test]
    fn leave_exception_closes_the_day_regardless_of_window() {
        let win = window("09:00", "14:00", 15);
        let result = resolve_day(Some(&win), Some(&leave_exception()));
        assert_eq!(result, Err(ClosedReason::Unavailable));
    }

    #[test]
    fn leave_exception_wins_even_without_a_window() {
        assert_eq!(resolve_day(None, Some(&leave_exception())), Err(ClosedReason::Unavailable));
    }

    #[test]
    fn missing_window_reports_no_schedule() {
        assert_eq!(resolve_day(None, None), Err(ClosedReason::NoSchedule));
    }

    #[test]
    fn custom_hours_override_times_but_not_slot_minutes() {
        let win = window("09:00", "14:00", 15);
        let exc = ScheduleException {
            id: Uuid::new_v4(),
            provider_id: win.provider_id,
            date: NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
            is_available: true,
            custom_start_time: Some("10:00".parse().unwrap()),
            custom_end_time: Some("12:00".parse().unwrap()),
            notes: None,
        };

        let (start, end, slot_minutes) = resolve_day(Some(&win), Some(&exc)).unwrap();
        assert_eq!(start, "10:00".parse().unwrap());
        assert_eq!(end, "12:00".parse().unwrap());
        assert_eq!(slot_minutes, 15);
    }

    #[test]
    fn partial_custom_hours_fall_back_per_field() {
        let win = window("09:00", "14:00", 15);
        let exc = ScheduleException {
            id: Uuid::new_v4(),
            provider_id: win.provider_id,
            date: NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
            is_available: true,
            custom_start_time: Some("11:00".parse().unwrap()),
            custom_end_time: None,
            notes: None,
        };

        let (start, end, _) = resolve_day(Some(&win), Some(&exc)).unwrap();
        assert_eq!(start, "11:00".parse().unwrap());
        assert_eq!(end, "14:00".parse().unwrap());
    }
}
