//! Email service for visitor and host notifications
//!
//! Delivery is best-effort: callers spawn sends off the request path and
//! log failures. Nothing in the check-in/issuance flow depends on the
//! outcome of a send.

use chrono::{DateTime, Utc};
use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Welcome email after registration
    pub async fn send_welcome(&self, to: &str, name: &str) -> AppResult<()> {
        let subject = "Welcome to the Visitor Management System";
        let body = format!(
            r#"
Hello {name},

Your account has been created successfully. You can now request
appointments and receive digital visitor passes.

If you have any questions, please contact the reception desk.
"#,
            name = name
        );

        self.send_email(to, subject, &body).await
    }

    /// Appointment approved/rejected notification for the visitor
    pub async fn send_appointment_decision(
        &self,
        to: &str,
        visitor_name: &str,
        scheduled_date: DateTime<Utc>,
        host_name: &str,
        approved: bool,
    ) -> AppResult<()> {
        let (subject, outcome) = if approved {
            ("Appointment Approved", "has been approved. Please arrive on time.")
        } else {
            ("Appointment Status Update", "has been declined.")
        };
        let body = format!(
            r#"
Dear {visitor_name},

Your appointment scheduled for {date} {outcome}

Host: {host_name}
"#,
            visitor_name = visitor_name,
            date = scheduled_date.format("%Y-%m-%d %H:%M UTC"),
            outcome = outcome,
            host_name = host_name
        );

        self.send_email(to, subject, &body).await
    }

    /// Pass-issued email with validity window for the visitor
    pub async fn send_pass_issued(
        &self,
        to: &str,
        visitor_name: &str,
        pass_id: &str,
        valid_from: DateTime<Utc>,
        valid_to: DateTime<Utc>,
    ) -> AppResult<()> {
        let subject = "Your Visitor Pass - Ready for Use";
        let body = format!(
            r#"
Hello {visitor_name},

Your visitor pass has been generated successfully.

Pass ID: {pass_id}
Valid From: {from}
Valid To: {to}

Show the QR code at the security desk on arrival, and remember to
check out before leaving the premises. This pass is non-transferable.
"#,
            visitor_name = visitor_name,
            pass_id = pass_id,
            from = valid_from.format("%Y-%m-%d"),
            to = valid_to.format("%Y-%m-%d")
        );

        self.send_email(to, subject, &body).await
    }

    /// Check-in notification for the host employee
    pub async fn send_check_in_notification(
        &self,
        to: &str,
        visitor_name: &str,
        check_in_time: DateTime<Utc>,
    ) -> AppResult<()> {
        let subject = format!("Visitor Checked In - {}", visitor_name);
        let body = format!(
            r#"
Your visitor {visitor_name} has checked in at the reception.

Check-in Time: {time}

Please be ready to receive your guest.
"#,
            visitor_name = visitor_name,
            time = check_in_time.format("%Y-%m-%d %H:%M UTC")
        );

        self.send_email(to, &subject, &body).await
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        if !self.config.enabled {
            tracing::debug!("Email delivery disabled, skipping send to {}", to);
            return Ok(());
        }

        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Visitor Management System");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) = (
            &self.config.smtp_username,
            &self.config.smtp_password,
        ) {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        mailer
            .send(&email)
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
