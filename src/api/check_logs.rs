//! Check-in/check-out endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::check_log::{CheckLogDetails, CheckLogQuery},
    services::check_logs::{
        CheckInOutcome, CheckInStats, CheckOutOutcome, TodayCheckIns, VisitorHistory,
    },
};

use super::AuthenticatedUser;

/// Check-in request
#[derive(Deserialize, ToSchema)]
pub struct CheckInRequest {
    /// Pass ID resolved from the scanned QR payload
    pub pass_id: Uuid,
    /// Location label, defaults to "Main Entrance"
    pub location: Option<String>,
}

/// Check-out request
#[derive(Deserialize, ToSchema)]
pub struct CheckOutRequest {
    /// Pass ID resolved from the scanned QR payload
    pub pass_id: Uuid,
}

/// Check-in response
#[derive(Serialize, ToSchema)]
pub struct CheckInResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: CheckInOutcome,
}

/// Check-out response
#[derive(Serialize, ToSchema)]
pub struct CheckOutResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: CheckOutOutcome,
}

/// Check a visitor in by scanned pass
#[utoipa::path(
    post,
    path = "/checklogs/checkin",
    tag = "checklogs",
    security(("bearer_auth" = [])),
    request_body = CheckInRequest,
    responses(
        (status = 201, description = "Check-in successful (idempotent on duplicate scans)", body = CheckInResponse),
        (status = 404, description = "Pass not found"),
        (status = 409, description = "Pass outside validity window or not active"),
        (status = 403, description = "Security or admin access required")
    )
)]
pub async fn check_in(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CheckInRequest>,
) -> AppResult<(StatusCode, Json<CheckInResponse>)> {
    claims.require_security_or_admin()?;

    let outcome = state
        .services
        .check_logs
        .check_in(request.pass_id, request.location, claims.user_id)
        .await?;

    let message = if outcome.already_checked_in {
        "Visitor already checked in".to_string()
    } else {
        "Check-in successful".to_string()
    };

    Ok((StatusCode::CREATED, Json(CheckInResponse { message, outcome })))
}

/// Check a visitor out by scanned pass
#[utoipa::path(
    post,
    path = "/checklogs/checkout",
    tag = "checklogs",
    security(("bearer_auth" = [])),
    request_body = CheckOutRequest,
    responses(
        (status = 200, description = "Check-out successful", body = CheckOutResponse),
        (status = 404, description = "No active check-in for this pass"),
        (status = 403, description = "Security or admin access required")
    )
)]
pub async fn check_out(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CheckOutRequest>,
) -> AppResult<Json<CheckOutResponse>> {
    claims.require_security_or_admin()?;

    let outcome = state.services.check_logs.check_out(request.pass_id).await?;

    Ok(Json(CheckOutResponse {
        message: "Check-out successful".to_string(),
        outcome,
    }))
}

/// Today's check-ins, split into active and completed
#[utoipa::path(
    get,
    path = "/checklogs/today",
    tag = "checklogs",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Today's check-ins", body = TodayCheckIns),
        (status = 403, description = "Security or admin access required")
    )
)]
pub async fn today_check_ins(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<TodayCheckIns>> {
    claims.require_security_or_admin()?;

    let today = state.services.check_logs.today().await?;
    Ok(Json(today))
}

/// List check logs with filters
#[utoipa::path(
    get,
    path = "/checklogs",
    tag = "checklogs",
    security(("bearer_auth" = [])),
    params(CheckLogQuery),
    responses(
        (status = 200, description = "Check logs", body = Vec<CheckLogDetails>),
        (status = 403, description = "Security or admin access required")
    )
)]
pub async fn list_check_logs(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<CheckLogQuery>,
) -> AppResult<Json<Vec<CheckLogDetails>>> {
    claims.require_security_or_admin()?;

    let logs = state.services.check_logs.list(&query).await?;
    Ok(Json(logs))
}

/// Aggregate check-in statistics
#[utoipa::path(
    get,
    path = "/checklogs/stats",
    tag = "checklogs",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Check-in statistics", body = CheckInStats),
        (status = 403, description = "Security or admin access required")
    )
)]
pub async fn check_in_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<CheckInStats>> {
    claims.require_security_or_admin()?;

    let stats = state.services.check_logs.stats().await?;
    Ok(Json(stats))
}

/// A visitor's recent visit history with aggregate stats
#[utoipa::path(
    get,
    path = "/checklogs/visitor/{id}",
    tag = "checklogs",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Visitor ID")
    ),
    responses(
        (status = 200, description = "Visitor history", body = VisitorHistory),
        (status = 404, description = "Visitor not found"),
        (status = 403, description = "Security or admin access required")
    )
)]
pub async fn visitor_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<VisitorHistory>> {
    claims.require_security_or_admin()?;

    let history = state.services.check_logs.visitor_history(id).await?;
    Ok(Json(history))
}

/// Get a single check log
#[utoipa::path(
    get,
    path = "/checklogs/{id}",
    tag = "checklogs",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Check log ID")
    ),
    responses(
        (status = 200, description = "Check log", body = CheckLogDetails),
        (status = 404, description = "Check log not found"),
        (status = 403, description = "Security or admin access required")
    )
)]
pub async fn get_check_log(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<CheckLogDetails>> {
    claims.require_security_or_admin()?;

    let log = state.services.check_logs.get_by_id(id).await?;
    Ok(Json(log))
}
