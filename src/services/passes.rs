//! Pass issuance service

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::pass::{CreatePass, PassDetails, PassStatus, QrPayload},
    repository::Repository,
    services::{documents::DocumentsService, email::EmailService, qr},
};

#[derive(Clone)]
pub struct PassesService {
    repository: Repository,
    documents: DocumentsService,
    email: EmailService,
}

impl PassesService {
    pub fn new(repository: Repository, documents: DocumentsService, email: EmailService) -> Self {
        Self {
            repository,
            documents,
            email,
        }
    }

    /// Issue a new pass for a visitor.
    ///
    /// The pass id is generated up front so the QR payload references the
    /// real identifier in a single insert.
    pub async fn issue(&self, request: CreatePass, issued_by: i32) -> AppResult<PassDetails> {
        let visitor = self.repository.visitors.get_by_id(request.visitor_id).await?;

        if request.valid_from > request.valid_to {
            return Err(AppError::Validation(
                "valid_from must not be after valid_to".to_string(),
            ));
        }

        if let Some(appointment_id) = request.appointment_id {
            self.repository.appointments.get_by_id(appointment_id).await?;
        }

        let pass_id = Uuid::new_v4();
        let payload = QrPayload {
            pass_id,
            visitor_id: visitor.id,
            visitor_name: visitor.name.clone(),
            valid_from: request.valid_from,
            valid_to: request.valid_to,
            issued_at: Utc::now(),
        };
        let qr_code = qr::encode_payload(&payload)?;

        let pass = self
            .repository
            .passes
            .create(
                pass_id,
                visitor.id,
                request.appointment_id,
                &qr_code,
                request.valid_from,
                request.valid_to,
                issued_by,
            )
            .await?;

        let pdf_path = self.documents.render_pass(&pass, &visitor)?;
        self.repository.passes.set_pdf_path(pass_id, &pdf_path).await?;

        // Best-effort pass email to the visitor
        if let Some(ref to) = visitor.email {
            let email = self.email.clone();
            let to = to.clone();
            let visitor_name = visitor.name.clone();
            let id_string = pass_id.to_string();
            let (valid_from, valid_to) = (pass.valid_from, pass.valid_to);
            tokio::spawn(async move {
                if let Err(e) = email
                    .send_pass_issued(&to, &visitor_name, &id_string, valid_from, valid_to)
                    .await
                {
                    tracing::warn!("Failed to send pass email to {}: {}", to, e);
                }
            });
        }

        self.repository.passes.get_details(pass_id).await
    }

    /// Revoke a pass so it can no longer be used for check-in
    pub async fn revoke(&self, id: Uuid) -> AppResult<PassDetails> {
        let pass = self.repository.passes.get_by_id(id).await?;
        if pass.status == PassStatus::Revoked {
            return Err(AppError::InvalidState("Pass is already revoked".to_string()));
        }

        self.repository
            .passes
            .set_status(id, PassStatus::Revoked)
            .await?;
        self.repository.passes.get_details(id).await
    }

    /// Get a single pass with details
    pub async fn get_details(&self, id: Uuid) -> AppResult<PassDetails> {
        self.repository.passes.get_details(id).await
    }

    /// List all passes with details
    pub async fn list(&self) -> AppResult<Vec<PassDetails>> {
        self.repository.passes.list().await
    }
}
