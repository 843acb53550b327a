//! Appointment model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};

use super::{user::UserShort, visitor::VisitorShort};

/// Appointment status. Approved and rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Rejected,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Approved => "approved",
            AppointmentStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Pending)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "approved" => Ok(AppointmentStatus::Approved),
            "rejected" => Ok(AppointmentStatus::Rejected),
            _ => Err(format!("Invalid appointment status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for AppointmentStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for AppointmentStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for AppointmentStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Appointment model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Appointment {
    pub id: i32,
    pub visitor_id: i32,
    pub host_id: i32,
    pub status: AppointmentStatus,
    pub scheduled_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Appointment with visitor and host resolved for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub visitor: Option<VisitorShort>,
    pub host: Option<UserShort>,
}

/// Short appointment representation for embedding in passes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AppointmentShort {
    pub id: i32,
    pub status: AppointmentStatus,
    pub scheduled_date: DateTime<Utc>,
}

/// Create appointment request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAppointment {
    pub visitor_id: i32,
    pub scheduled_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Appointment list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct AppointmentQuery {
    /// Filter by status (pending, approved, rejected)
    pub status: Option<AppointmentStatus>,
    /// Only appointments scheduled on or after this instant
    pub date: Option<DateTime<Utc>>,
}
