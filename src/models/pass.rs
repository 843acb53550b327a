//! Visitor pass model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{appointment::AppointmentShort, user::UserShort, visitor::VisitorShort};

/// Pass status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PassStatus {
    Active,
    Expired,
    Revoked,
}

impl PassStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PassStatus::Active => "active",
            PassStatus::Expired => "expired",
            PassStatus::Revoked => "revoked",
        }
    }
}

impl std::fmt::Display for PassStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PassStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(PassStatus::Active),
            "expired" => Ok(PassStatus::Expired),
            "revoked" => Ok(PassStatus::Revoked),
            _ => Err(format!("Invalid pass status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for PassStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for PassStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for PassStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Pass model from database
///
/// The id is generated before insert so the QR payload can reference it in
/// a single write. `is_active` is kept consistent with `status` on every
/// write for compatibility with older clients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Pass {
    pub id: Uuid,
    pub visitor_id: i32,
    pub appointment_id: Option<i32>,
    /// QR payload as a base64 PNG data URL
    pub qr_code: String,
    pub pdf_path: Option<String>,
    pub status: PassStatus,
    pub is_active: bool,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub issued_by: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pass with visitor, appointment and issuer resolved for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PassDetails {
    #[serde(flatten)]
    pub pass: Pass,
    pub visitor: Option<VisitorShort>,
    pub appointment: Option<AppointmentShort>,
    pub issued_by_user: Option<UserShort>,
}

/// Issue pass request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePass {
    pub visitor_id: i32,
    pub appointment_id: Option<i32>,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
}

/// Structure encoded into the scannable QR payload
#[derive(Debug, Serialize, Deserialize)]
pub struct QrPayload {
    pub pass_id: Uuid,
    pub visitor_id: i32,
    pub visitor_name: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub issued_at: DateTime<Utc>,
}
