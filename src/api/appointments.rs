//! Appointment management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::appointment::{AppointmentDetails, AppointmentQuery, CreateAppointment},
};

use super::AuthenticatedUser;

/// Appointment decision response
#[derive(Serialize, ToSchema)]
pub struct AppointmentResponse {
    pub message: String,
    pub appointment: AppointmentDetails,
}

/// Create a new appointment request (caller is the host)
#[utoipa::path(
    post,
    path = "/appointments",
    tag = "appointments",
    security(("bearer_auth" = [])),
    request_body = CreateAppointment,
    responses(
        (status = 201, description = "Appointment created", body = AppointmentResponse),
        (status = 404, description = "Visitor not found")
    )
)]
pub async fn create_appointment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateAppointment>,
) -> AppResult<(StatusCode, Json<AppointmentResponse>)> {
    let appointment = state
        .services
        .appointments
        .create(request, claims.user_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AppointmentResponse {
            message: "Appointment created successfully".to_string(),
            appointment,
        }),
    ))
}

/// List appointments, optionally filtered by status and date
#[utoipa::path(
    get,
    path = "/appointments",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(AppointmentQuery),
    responses(
        (status = 200, description = "Appointments", body = Vec<AppointmentDetails>)
    )
)]
pub async fn list_appointments(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<AppointmentQuery>,
) -> AppResult<Json<Vec<AppointmentDetails>>> {
    let appointments = state.services.appointments.list(&query).await?;
    Ok(Json(appointments))
}

/// Get a single appointment
#[utoipa::path(
    get,
    path = "/appointments/{id}",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Appointment ID")
    ),
    responses(
        (status = 200, description = "Appointment", body = AppointmentDetails),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn get_appointment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AppointmentDetails>> {
    let appointment = state.services.appointments.get_details(id).await?;
    Ok(Json(appointment))
}

/// Approve a pending appointment
#[utoipa::path(
    patch,
    path = "/appointments/{id}/approve",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Appointment ID")
    ),
    responses(
        (status = 200, description = "Appointment approved", body = AppointmentResponse),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Appointment already decided")
    )
)]
pub async fn approve_appointment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AppointmentResponse>> {
    claims.require_employee_or_admin()?;

    let appointment = state.services.appointments.approve(id).await?;

    Ok(Json(AppointmentResponse {
        message: "Appointment approved successfully".to_string(),
        appointment,
    }))
}

/// Reject a pending appointment
#[utoipa::path(
    patch,
    path = "/appointments/{id}/reject",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Appointment ID")
    ),
    responses(
        (status = 200, description = "Appointment rejected", body = AppointmentResponse),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Appointment already decided")
    )
)]
pub async fn reject_appointment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AppointmentResponse>> {
    claims.require_employee_or_admin()?;

    let appointment = state.services.appointments.reject(id).await?;

    Ok(Json(AppointmentResponse {
        message: "Appointment rejected".to_string(),
        appointment,
    }))
}

/// Delete an appointment
#[utoipa::path(
    delete,
    path = "/appointments/{id}",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Appointment ID")
    ),
    responses(
        (status = 204, description = "Appointment deleted"),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn delete_appointment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.appointments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
