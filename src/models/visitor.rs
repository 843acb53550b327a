//! Visitor model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::user::UserShort;

/// Visitor model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Visitor {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Short visitor representation for embedding in passes and check logs
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct VisitorShort {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Visitor with creator details for listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisitorDetails {
    #[serde(flatten)]
    pub visitor: Visitor,
    pub created_by_user: Option<UserShort>,
}

/// Create visitor request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVisitor {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<String>,
}
