//! Visitor management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::visitor::{CreateVisitor, Visitor, VisitorDetails},
};

use super::AuthenticatedUser;

/// Register a new visitor
#[utoipa::path(
    post,
    path = "/visitors",
    tag = "visitors",
    security(("bearer_auth" = [])),
    request_body = CreateVisitor,
    responses(
        (status = 201, description = "Visitor created", body = Visitor),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Staff access required")
    )
)]
pub async fn create_visitor(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateVisitor>,
) -> AppResult<(StatusCode, Json<Visitor>)> {
    claims.require_staff()?;

    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let visitor = state
        .services
        .visitors
        .create(request, claims.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(visitor)))
}

/// List all visitors
#[utoipa::path(
    get,
    path = "/visitors",
    tag = "visitors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All visitors", body = Vec<VisitorDetails>),
        (status = 403, description = "Staff access required")
    )
)]
pub async fn list_visitors(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<VisitorDetails>>> {
    claims.require_staff()?;

    let visitors = state.services.visitors.list().await?;
    Ok(Json(visitors))
}

/// Get a single visitor
#[utoipa::path(
    get,
    path = "/visitors/{id}",
    tag = "visitors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Visitor ID")
    ),
    responses(
        (status = 200, description = "Visitor", body = Visitor),
        (status = 404, description = "Visitor not found")
    )
)]
pub async fn get_visitor(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Visitor>> {
    claims.require_staff()?;

    let visitor = state.services.visitors.get_by_id(id).await?;
    Ok(Json(visitor))
}
