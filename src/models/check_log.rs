//! Check-in/check-out log model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::visitor::VisitorShort;

/// Default location label when a scan does not provide one
pub const DEFAULT_LOCATION: &str = "Main Entrance";

/// Check log model from database
///
/// One record per physical visit. `check_out_time` is null while the
/// visitor is on premises; at most one open log exists per pass (enforced
/// by a partial unique index on `pass_id WHERE check_out_time IS NULL`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CheckLog {
    pub id: i32,
    pub pass_id: Uuid,
    pub visitor_id: i32,
    pub scanned_by: i32,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub location: String,
    /// Whole minutes between check-in and check-out, set at check-out
    pub duration_minutes: Option<i32>,
}

/// Check log with visitor, pass window and officer resolved for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckLogDetails {
    #[serde(flatten)]
    pub log: CheckLog,
    pub visitor: Option<VisitorShort>,
    pub officer_name: Option<String>,
    pub pass_valid_from: Option<DateTime<Utc>>,
    pub pass_valid_to: Option<DateTime<Utc>>,
}

/// Completion filter for check log listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CheckLogStatus {
    /// Checked in, not yet checked out
    Active,
    /// Checked out
    Completed,
}

/// Check log list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CheckLogQuery {
    /// Only logs with check-in on or after this date
    pub start_date: Option<NaiveDate>,
    /// Only logs with check-in on or before this date (inclusive of the whole day)
    pub end_date: Option<NaiveDate>,
    /// Filter by visitor id
    pub visitor: Option<i32>,
    /// Filter by completion status
    pub status: Option<CheckLogStatus>,
}

/// One hour-of-day bucket for the check-in stats endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HourlyCount {
    pub hour: i32,
    pub count: i64,
}
