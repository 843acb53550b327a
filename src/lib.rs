//! Gatepass Visitor Management System
//!
//! A Rust REST API server for managing facility visitors: appointment
//! scheduling, QR gate pass issuance, and check-in/check-out tracking.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
