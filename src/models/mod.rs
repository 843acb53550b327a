//! Data models for Gatepass entities

pub mod appointment;
pub mod check_log;
pub mod pass;
pub mod user;
pub mod visitor;
