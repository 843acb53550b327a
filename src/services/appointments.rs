//! Appointment management service

use crate::{
    error::{AppError, AppResult},
    models::appointment::{
        AppointmentDetails, AppointmentQuery, AppointmentStatus, CreateAppointment,
    },
    repository::Repository,
    services::email::EmailService,
};

#[derive(Clone)]
pub struct AppointmentsService {
    repository: Repository,
    email: EmailService,
}

impl AppointmentsService {
    pub fn new(repository: Repository, email: EmailService) -> Self {
        Self { repository, email }
    }

    /// Create an appointment request, host is the calling user
    pub async fn create(
        &self,
        request: CreateAppointment,
        host_id: i32,
    ) -> AppResult<AppointmentDetails> {
        // Verify visitor exists
        self.repository
            .visitors
            .get_by_id(request.visitor_id)
            .await?;

        let appointment = self.repository.appointments.create(&request, host_id).await?;
        self.repository.appointments.get_details(appointment.id).await
    }

    /// List appointments with filters
    pub async fn list(&self, query: &AppointmentQuery) -> AppResult<Vec<AppointmentDetails>> {
        self.repository.appointments.list(query).await
    }

    /// Get a single appointment with details
    pub async fn get_details(&self, id: i32) -> AppResult<AppointmentDetails> {
        self.repository.appointments.get_details(id).await
    }

    /// Approve a pending appointment
    pub async fn approve(&self, id: i32) -> AppResult<AppointmentDetails> {
        self.decide(id, AppointmentStatus::Approved).await
    }

    /// Reject a pending appointment
    pub async fn reject(&self, id: i32) -> AppResult<AppointmentDetails> {
        self.decide(id, AppointmentStatus::Rejected).await
    }

    /// Delete an appointment
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.appointments.delete(id).await
    }

    /// Apply a terminal decision. Approved/rejected appointments cannot be
    /// decided again.
    async fn decide(&self, id: i32, status: AppointmentStatus) -> AppResult<AppointmentDetails> {
        let current = self.repository.appointments.get_by_id(id).await?;
        if current.status.is_terminal() {
            return Err(AppError::InvalidState(format!(
                "Appointment is already {}",
                current.status
            )));
        }

        self.repository.appointments.set_status(id, status).await?;
        let details = self.repository.appointments.get_details(id).await?;

        // Best-effort visitor notification, failure never surfaces
        if let Some(ref visitor) = details.visitor {
            if let Some(ref to) = visitor.email {
                let email = self.email.clone();
                let to = to.clone();
                let visitor_name = visitor.name.clone();
                let host_name = details
                    .host
                    .as_ref()
                    .map(|h| h.name.clone())
                    .unwrap_or_default();
                let scheduled_date = details.appointment.scheduled_date;
                let approved = status == AppointmentStatus::Approved;
                tokio::spawn(async move {
                    if let Err(e) = email
                        .send_appointment_decision(
                            &to,
                            &visitor_name,
                            scheduled_date,
                            &host_name,
                            approved,
                        )
                        .await
                    {
                        tracing::warn!("Failed to send appointment notification to {}: {}", to, e);
                    }
                });
            }
        }

        Ok(details)
    }
}
