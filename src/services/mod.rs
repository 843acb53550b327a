//! Business logic services

pub mod appointments;
pub mod check_logs;
pub mod documents;
pub mod email;
pub mod passes;
pub mod qr;
pub mod users;
pub mod visitors;

use crate::{
    config::{AuthConfig, EmailConfig, StorageConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub visitors: visitors::VisitorsService,
    pub appointments: appointments::AppointmentsService,
    pub passes: passes::PassesService,
    pub check_logs: check_logs::CheckLogsService,
    pub email: email::EmailService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        email_config: EmailConfig,
        storage_config: StorageConfig,
    ) -> Self {
        let email = email::EmailService::new(email_config);
        let documents = documents::DocumentsService::new(&storage_config);

        Self {
            users: users::UsersService::new(repository.clone(), auth_config, email.clone()),
            visitors: visitors::VisitorsService::new(repository.clone()),
            appointments: appointments::AppointmentsService::new(
                repository.clone(),
                email.clone(),
            ),
            passes: passes::PassesService::new(repository.clone(), documents, email.clone()),
            check_logs: check_logs::CheckLogsService::new(repository, email.clone()),
            email,
        }
    }
}
