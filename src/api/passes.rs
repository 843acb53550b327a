//! Pass issuance endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::pass::{CreatePass, PassDetails},
};

use super::AuthenticatedUser;

/// Issue pass response
#[derive(Serialize, ToSchema)]
pub struct IssuePassResponse {
    pub message: String,
    pub pass: PassDetails,
    /// URL of the rendered pass document
    pub pdf_url: Option<String>,
}

/// Issue a new pass for a visitor
#[utoipa::path(
    post,
    path = "/passes",
    tag = "passes",
    security(("bearer_auth" = [])),
    request_body = CreatePass,
    responses(
        (status = 201, description = "Pass issued", body = IssuePassResponse),
        (status = 400, description = "Invalid validity window"),
        (status = 404, description = "Visitor or appointment not found"),
        (status = 403, description = "Employee or admin access required")
    )
)]
pub async fn issue_pass(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreatePass>,
) -> AppResult<(StatusCode, Json<IssuePassResponse>)> {
    claims.require_employee_or_admin()?;

    let pass = state.services.passes.issue(request, claims.user_id).await?;
    let pdf_url = pass.pass.pdf_path.as_ref().map(|p| format!("/{}", p));

    Ok((
        StatusCode::CREATED,
        Json(IssuePassResponse {
            message: "Pass generated successfully".to_string(),
            pass,
            pdf_url,
        }),
    ))
}

/// Revoke a pass
#[utoipa::path(
    patch,
    path = "/passes/{id}/revoke",
    tag = "passes",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Pass ID")
    ),
    responses(
        (status = 200, description = "Pass revoked", body = IssuePassResponse),
        (status = 404, description = "Pass not found"),
        (status = 409, description = "Pass is already revoked"),
        (status = 403, description = "Employee or admin access required")
    )
)]
pub async fn revoke_pass(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<IssuePassResponse>> {
    claims.require_employee_or_admin()?;

    let pass = state.services.passes.revoke(id).await?;
    let pdf_url = pass.pass.pdf_path.as_ref().map(|p| format!("/{}", p));

    Ok(Json(IssuePassResponse {
        message: "Pass revoked".to_string(),
        pass,
        pdf_url,
    }))
}

/// List all passes
#[utoipa::path(
    get,
    path = "/passes",
    tag = "passes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All passes", body = Vec<PassDetails>)
    )
)]
pub async fn list_passes(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<PassDetails>>> {
    let passes = state.services.passes.list().await?;
    Ok(Json(passes))
}

/// Get a single pass
#[utoipa::path(
    get,
    path = "/passes/{id}",
    tag = "passes",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Pass ID")
    ),
    responses(
        (status = 200, description = "Pass", body = PassDetails),
        (status = 404, description = "Pass not found")
    )
)]
pub async fn get_pass(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PassDetails>> {
    let pass = state.services.passes.get_details(id).await?;
    Ok(Json(pass))
}
