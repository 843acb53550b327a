//! Gatepass Server - Visitor Management System
//!
//! A Rust REST API server for visitor registration, appointment approval,
//! QR gate pass issuance, and check-in/check-out tracking.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gatepass_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("gatepass_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Gatepass Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address and uploads dir before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    let uploads_dir = config.storage.uploads_dir.clone();

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(
        repository,
        config.auth.clone(),
        config.email.clone(),
        config.storage.clone(),
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state, &uploads_dir);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState, uploads_dir: &str) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Visitors
        .route("/visitors", post(api::visitors::create_visitor))
        .route("/visitors", get(api::visitors::list_visitors))
        .route("/visitors/:id", get(api::visitors::get_visitor))
        // Appointments
        .route("/appointments", post(api::appointments::create_appointment))
        .route("/appointments", get(api::appointments::list_appointments))
        .route("/appointments/:id", get(api::appointments::get_appointment))
        .route("/appointments/:id", delete(api::appointments::delete_appointment))
        .route("/appointments/:id/approve", patch(api::appointments::approve_appointment))
        .route("/appointments/:id/reject", patch(api::appointments::reject_appointment))
        // Passes
        .route("/passes", post(api::passes::issue_pass))
        .route("/passes", get(api::passes::list_passes))
        .route("/passes/:id", get(api::passes::get_pass))
        .route("/passes/:id/revoke", patch(api::passes::revoke_pass))
        // Check logs
        .route("/checklogs/checkin", post(api::check_logs::check_in))
        .route("/checklogs/checkout", post(api::check_logs::check_out))
        .route("/checklogs/today", get(api::check_logs::today_check_ins))
        .route("/checklogs/stats", get(api::check_logs::check_in_stats))
        .route("/checklogs/visitor/:id", get(api::check_logs::visitor_history))
        .route("/checklogs/:id", get(api::check_logs::get_check_log))
        .route("/checklogs", get(api::check_logs::list_check_logs))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
