//! Repository layer for database operations

pub mod appointments;
pub mod check_logs;
pub mod passes;
pub mod users;
pub mod visitors;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub visitors: visitors::VisitorsRepository,
    pub appointments: appointments::AppointmentsRepository,
    pub passes: passes::PassesRepository,
    pub check_logs: check_logs::CheckLogsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            visitors: visitors::VisitorsRepository::new(pool.clone()),
            appointments: appointments::AppointmentsRepository::new(pool.clone()),
            passes: passes::PassesRepository::new(pool.clone()),
            check_logs: check_logs::CheckLogsRepository::new(pool.clone()),
            pool,
        }
    }
}
