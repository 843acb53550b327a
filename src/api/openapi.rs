//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{appointments, auth, check_logs, health, passes, visitors};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gatepass API",
        version = "1.0.0",
        description = "Visitor Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Gatepass Team", email = "contact@gatepass.dev")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Visitors
        visitors::create_visitor,
        visitors::list_visitors,
        visitors::get_visitor,
        // Appointments
        appointments::create_appointment,
        appointments::list_appointments,
        appointments::get_appointment,
        appointments::approve_appointment,
        appointments::reject_appointment,
        appointments::delete_appointment,
        // Passes
        passes::issue_pass,
        passes::list_passes,
        passes::get_pass,
        passes::revoke_pass,
        // Check logs
        check_logs::check_in,
        check_logs::check_out,
        check_logs::today_check_ins,
        check_logs::list_check_logs,
        check_logs::check_in_stats,
        check_logs::visitor_history,
        check_logs::get_check_log,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterResponse,
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::user::RegisterUser,
            crate::models::user::Role,
            crate::models::user::UserStatus,
            // Visitors
            crate::models::visitor::Visitor,
            crate::models::visitor::VisitorShort,
            crate::models::visitor::VisitorDetails,
            crate::models::visitor::CreateVisitor,
            // Appointments
            appointments::AppointmentResponse,
            crate::models::appointment::Appointment,
            crate::models::appointment::AppointmentDetails,
            crate::models::appointment::AppointmentShort,
            crate::models::appointment::AppointmentStatus,
            crate::models::appointment::CreateAppointment,
            // Passes
            passes::IssuePassResponse,
            crate::models::pass::Pass,
            crate::models::pass::PassDetails,
            crate::models::pass::PassStatus,
            crate::models::pass::CreatePass,
            // Check logs
            check_logs::CheckInRequest,
            check_logs::CheckOutRequest,
            check_logs::CheckInResponse,
            check_logs::CheckOutResponse,
            crate::models::check_log::CheckLog,
            crate::models::check_log::CheckLogDetails,
            crate::models::check_log::CheckLogStatus,
            crate::models::check_log::HourlyCount,
            crate::services::check_logs::CheckInOutcome,
            crate::services::check_logs::CheckOutOutcome,
            crate::services::check_logs::TodayCheckIns,
            crate::services::check_logs::CheckInStats,
            crate::services::check_logs::VisitorVisitStats,
            crate::services::check_logs::VisitorHistory,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "visitors", description = "Visitor management"),
        (name = "appointments", description = "Appointment scheduling and approval"),
        (name = "passes", description = "Gate pass issuance"),
        (name = "checklogs", description = "Check-in/check-out tracking")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
