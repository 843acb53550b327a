//! Check-in/check-out state machine and log queries
//!
//! Window policy: pass validity is compared on calendar days (UTC), so a
//! pass valid "today" works all day regardless of the exact timestamps.
//! A scan against a pass that is already checked in is an idempotent
//! success, not an error.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        check_log::{CheckLog, CheckLogDetails, CheckLogQuery, DEFAULT_LOCATION, HourlyCount},
        pass::{Pass, PassStatus},
        visitor::VisitorShort,
    },
    repository::Repository,
    services::email::EmailService,
};

/// Result of a check-in scan
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckInOutcome {
    pub check_log: CheckLogDetails,
    pub visitor: Option<VisitorShort>,
    /// True when the pass already had an open log (duplicate scan)
    pub already_checked_in: bool,
}

/// Result of a check-out scan
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckOutOutcome {
    pub check_log: CheckLog,
    /// Formatted visit duration, e.g. "2h 15m"
    pub duration: String,
}

/// Today's check-ins, split into on-premises and departed
#[derive(Debug, Serialize, ToSchema)]
pub struct TodayCheckIns {
    pub total: usize,
    pub active: Vec<CheckLogDetails>,
    pub completed: Vec<CheckLogDetails>,
}

/// Aggregate check-in counters
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckInStats {
    pub today: i64,
    pub this_week: i64,
    pub this_month: i64,
    pub active_now: i64,
    pub hourly_distribution: Vec<HourlyCount>,
}

/// Visit statistics for one visitor
#[derive(Debug, Serialize, ToSchema)]
pub struct VisitorVisitStats {
    pub total_visits: usize,
    pub last_visit: Option<DateTime<Utc>>,
    /// Mean duration in minutes over completed visits, 0 when none
    pub average_duration: f64,
}

/// Visitor history response
#[derive(Debug, Serialize, ToSchema)]
pub struct VisitorHistory {
    pub stats: VisitorVisitStats,
    pub history: Vec<CheckLogDetails>,
}

/// Number of history entries considered per visitor
const HISTORY_LIMIT: i64 = 20;

#[derive(Clone)]
pub struct CheckLogsService {
    repository: Repository,
    email: EmailService,
}

impl CheckLogsService {
    pub fn new(repository: Repository, email: EmailService) -> Self {
        Self { repository, email }
    }

    /// Check a visitor in by pass id.
    ///
    /// Validates the pass window and status, then creates the open log.
    /// The open-log uniqueness is enforced by the store; a concurrent or
    /// repeated scan surfaces the existing log with `already_checked_in`.
    pub async fn check_in(
        &self,
        pass_id: Uuid,
        location: Option<String>,
        scanned_by: i32,
    ) -> AppResult<CheckInOutcome> {
        let pass = self.repository.passes.get_by_id(pass_id).await?;

        validate_window(Utc::now(), &pass)?;

        if pass.status != PassStatus::Active {
            return Err(AppError::InvalidState(format!("Pass is {}", pass.status)));
        }

        let location = location.unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        let (log, already_checked_in) = match self
            .repository
            .check_logs
            .insert_open(pass_id, pass.visitor_id, scanned_by, &location)
            .await?
        {
            Some(log) => (log, false),
            None => {
                // Lost the race (or duplicate scan): surface the open log
                let existing = self
                    .repository
                    .check_logs
                    .find_open_by_pass(pass_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Conflict(
                            "Concurrent check-in/check-out on this pass, please retry".to_string(),
                        )
                    })?;
                (existing, true)
            }
        };

        let check_log = self.repository.check_logs.get_details_by_id(log.id).await?;
        let visitor = self.repository.visitors.get_short(pass.visitor_id).await?;

        if !already_checked_in {
            self.notify_host(&pass, &visitor, log.check_in_time).await;
        }

        Ok(CheckInOutcome {
            check_log,
            visitor,
            already_checked_in,
        })
    }

    /// Check a visitor out by pass id, computing the visit duration
    pub async fn check_out(&self, pass_id: Uuid) -> AppResult<CheckOutOutcome> {
        let log = self
            .repository
            .check_logs
            .close_open(pass_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No active check-in found for this pass".to_string())
            })?;

        let duration = format_duration(log.duration_minutes.unwrap_or(0));

        Ok(CheckOutOutcome {
            check_log: log,
            duration,
        })
    }

    /// Today's check-ins split by completion
    pub async fn today(&self) -> AppResult<TodayCheckIns> {
        let logs = self
            .repository
            .check_logs
            .list_since(start_of_day(Utc::now()))
            .await?;

        let (active, completed): (Vec<_>, Vec<_>) = logs
            .into_iter()
            .partition(|details| details.log.check_out_time.is_none());

        Ok(TodayCheckIns {
            total: active.len() + completed.len(),
            active,
            completed,
        })
    }

    /// List check logs with filters
    pub async fn list(&self, query: &CheckLogQuery) -> AppResult<Vec<CheckLogDetails>> {
        self.repository.check_logs.list(query).await
    }

    /// Get a single check log with details
    pub async fn get_by_id(&self, id: i32) -> AppResult<CheckLogDetails> {
        self.repository.check_logs.get_details_by_id(id).await
    }

    /// Aggregate counters plus today's hourly distribution
    pub async fn stats(&self) -> AppResult<CheckInStats> {
        let today = start_of_day(Utc::now());
        let this_week = today - Duration::days(7);
        let this_month = today - Duration::days(30);

        let (today_count, week_count, month_count, active_now, hourly_distribution) = tokio::try_join!(
            self.repository.check_logs.count_since(today),
            self.repository.check_logs.count_since(this_week),
            self.repository.check_logs.count_since(this_month),
            self.repository.check_logs.count_active_since(today),
            self.repository.check_logs.hourly_distribution(today),
        )?;

        Ok(CheckInStats {
            today: today_count,
            this_week: week_count,
            this_month: month_count,
            active_now,
            hourly_distribution,
        })
    }

    /// Last visits for one visitor with aggregate stats
    pub async fn visitor_history(&self, visitor_id: i32) -> AppResult<VisitorHistory> {
        // Verify visitor exists
        self.repository.visitors.get_by_id(visitor_id).await?;

        let history = self
            .repository
            .check_logs
            .visitor_history(visitor_id, HISTORY_LIMIT)
            .await?;

        let stats = VisitorVisitStats {
            total_visits: history.len(),
            last_visit: history.first().map(|details| details.log.check_in_time),
            average_duration: average_duration(&history),
        };

        Ok(VisitorHistory { stats, history })
    }

    /// Fire-and-forget check-in notification to the appointment host
    async fn notify_host(
        &self,
        pass: &Pass,
        visitor: &Option<VisitorShort>,
        check_in_time: DateTime<Utc>,
    ) {
        let Some(appointment_id) = pass.appointment_id else {
            return;
        };
        let Some(visitor_name) = visitor.as_ref().map(|v| v.name.clone()) else {
            return;
        };

        let host = match self.repository.appointments.get_details(appointment_id).await {
            Ok(details) => details.host,
            Err(e) => {
                tracing::warn!("Failed to resolve host for check-in notification: {}", e);
                return;
            }
        };
        let Some(host) = host else { return };

        let email = self.email.clone();
        tokio::spawn(async move {
            if let Err(e) = email
                .send_check_in_notification(&host.email, &visitor_name, check_in_time)
                .await
            {
                tracing::warn!(
                    "Failed to send check-in notification to {}: {}",
                    host.email,
                    e
                );
            }
        });
    }
}

/// Truncate an instant to UTC midnight
fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), now.day(), 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// Calendar-day window check: a pass valid today works all day
fn validate_window(now: DateTime<Utc>, pass: &Pass) -> AppResult<()> {
    let today = now.date_naive();
    if today < pass.valid_from.date_naive() {
        return Err(AppError::InvalidState(format!(
            "Pass is not yet valid. Valid from: {}",
            pass.valid_from.format("%Y-%m-%d")
        )));
    }
    if today > pass.valid_to.date_naive() {
        return Err(AppError::InvalidState(format!(
            "Pass expired. Valid until: {}",
            pass.valid_to.format("%Y-%m-%d")
        )));
    }
    Ok(())
}

/// Format whole minutes as "{hours}h {minutes}m"
fn format_duration(minutes: i32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Mean duration over completed visits; 0 when there are none
fn average_duration(history: &[CheckLogDetails]) -> f64 {
    let durations: Vec<i32> = history
        .iter()
        .filter_map(|details| details.log.duration_minutes)
        .collect();
    if durations.is_empty() {
        return 0.0;
    }
    durations.iter().map(|&d| f64::from(d)).sum::<f64>() / durations.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::check_log::CheckLog;

    fn pass(valid_from: &str, valid_to: &str) -> Pass {
        Pass {
            id: Uuid::new_v4(),
            visitor_id: 1,
            appointment_id: None,
            qr_code: String::new(),
            pdf_path: None,
            status: PassStatus::Active,
            is_active: true,
            valid_from: valid_from.parse().unwrap(),
            valid_to: valid_to.parse().unwrap(),
            issued_by: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn details(duration_minutes: Option<i32>) -> CheckLogDetails {
        CheckLogDetails {
            log: CheckLog {
                id: 1,
                pass_id: Uuid::new_v4(),
                visitor_id: 1,
                scanned_by: 1,
                check_in_time: Utc::now(),
                check_out_time: None,
                location: DEFAULT_LOCATION.to_string(),
                duration_minutes,
            },
            visitor: None,
            officer_name: None,
            pass_valid_from: None,
            pass_valid_to: None,
        }
    }

    #[test]
    fn window_accepts_instant_inside() {
        let pass = pass("2024-01-01T00:00:00Z", "2024-01-31T23:59:00Z");
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        assert!(validate_window(now, &pass).is_ok());
    }

    #[test]
    fn window_is_day_normalized() {
        // 23:30 on the last valid day passes even though valid_to is 09:00
        let pass = pass("2024-01-01T09:00:00Z", "2024-01-31T09:00:00Z");
        let now = Utc.with_ymd_and_hms(2024, 1, 31, 23, 30, 0).unwrap();
        assert!(validate_window(now, &pass).is_ok());
    }

    #[test]
    fn window_rejects_expired_with_date_in_message() {
        let pass = pass("2024-01-01T00:00:00Z", "2024-01-31T23:59:00Z");
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let err = validate_window(now, &pass).unwrap_err();
        match err {
            AppError::InvalidState(msg) => {
                assert!(msg.contains("expired"));
                assert!(msg.contains("2024-01-31"));
            }
            other => panic!("Expected InvalidState, got {:?}", other),
        }
    }

    #[test]
    fn window_rejects_not_yet_valid() {
        let pass = pass("2024-03-01T00:00:00Z", "2024-03-31T23:59:00Z");
        let now = Utc.with_ymd_and_hms(2024, 2, 28, 12, 0, 0).unwrap();
        let err = validate_window(now, &pass).unwrap_err();
        match err {
            AppError::InvalidState(msg) => assert!(msg.contains("not yet valid")),
            other => panic!("Expected InvalidState, got {:?}", other),
        }
    }

    #[test]
    fn duration_formats_hours_and_minutes() {
        assert_eq!(format_duration(0), "0h 0m");
        assert_eq!(format_duration(59), "0h 59m");
        assert_eq!(format_duration(60), "1h 0m");
        assert_eq!(format_duration(135), "2h 15m");
    }

    #[test]
    fn average_duration_guards_empty_history() {
        assert_eq!(average_duration(&[]), 0.0);
        // Logs exist but none completed
        assert_eq!(average_duration(&[details(None), details(None)]), 0.0);
    }

    #[test]
    fn average_duration_ignores_open_logs() {
        let history = vec![details(Some(30)), details(None), details(Some(90))];
        assert_eq!(average_duration(&history), 60.0);
    }

    #[test]
    fn start_of_day_truncates_to_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 17, 42, 9).unwrap();
        let midnight = start_of_day(now);
        assert_eq!(midnight, Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap());
    }
}
