//! Passes repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        appointment::AppointmentShort,
        pass::{Pass, PassDetails, PassStatus},
        user::UserShort,
        visitor::VisitorShort,
    },
};

#[derive(Clone)]
pub struct PassesRepository {
    pool: Pool<Postgres>,
}

impl PassesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get pass by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Pass> {
        sqlx::query_as::<_, Pass>("SELECT * FROM passes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Pass not found".to_string()))
    }

    /// Insert a pass with a pre-generated id and final QR payload.
    /// Status starts as active, is_active mirrors it.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        id: Uuid,
        visitor_id: i32,
        appointment_id: Option<i32>,
        qr_code: &str,
        valid_from: DateTime<Utc>,
        valid_to: DateTime<Utc>,
        issued_by: i32,
    ) -> AppResult<Pass> {
        let row = sqlx::query_as::<_, Pass>(
            r#"
            INSERT INTO passes
                (id, visitor_id, appointment_id, qr_code, status, is_active,
                 valid_from, valid_to, issued_by)
            VALUES ($1, $2, $3, $4, 'active', TRUE, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(visitor_id)
        .bind(appointment_id)
        .bind(qr_code)
        .bind(valid_from)
        .bind(valid_to)
        .bind(issued_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Record the rendered document path on the pass
    pub async fn set_pdf_path(&self, id: Uuid, pdf_path: &str) -> AppResult<()> {
        sqlx::query("UPDATE passes SET pdf_path = $1, updated_at = NOW() WHERE id = $2")
            .bind(pdf_path)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Update pass status, keeping the redundant is_active flag consistent
    pub async fn set_status(&self, id: Uuid, status: PassStatus) -> AppResult<Pass> {
        let row = sqlx::query_as::<_, Pass>(
            r#"
            UPDATE passes SET status = $1, is_active = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(status == PassStatus::Active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Pass not found".to_string()))?;

        Ok(row)
    }

    /// Get pass with visitor, appointment and issuer resolved
    pub async fn get_details(&self, id: Uuid) -> AppResult<PassDetails> {
        self.fetch_details(Some(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Pass not found".to_string()))
    }

    /// List all passes with details, newest first
    pub async fn list(&self) -> AppResult<Vec<PassDetails>> {
        self.fetch_details(None).await
    }

    async fn fetch_details(&self, id: Option<Uuid>) -> AppResult<Vec<PassDetails>> {
        let where_clause = if id.is_some() { "WHERE p.id = $1" } else { "" };
        let sql = format!(
            r#"
            SELECT p.*,
                   v.id as v_id, v.name as v_name, v.email as v_email, v.phone as v_phone,
                   a.id as a_id, a.status as a_status, a.scheduled_date as a_scheduled_date,
                   u.id as u_id, u.name as u_name, u.email as u_email, u.role as u_role
            FROM passes p
            LEFT JOIN visitors v ON p.visitor_id = v.id
            LEFT JOIN appointments a ON p.appointment_id = a.id
            LEFT JOIN users u ON p.issued_by = u.id
            {}
            ORDER BY p.created_at DESC
            "#,
            where_clause
        );

        let mut builder = sqlx::query(&sql);
        if let Some(id) = id {
            builder = builder.bind(id);
        }

        let rows = builder.fetch_all(&self.pool).await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let pass = Pass {
                id: row.get("id"),
                visitor_id: row.get("visitor_id"),
                appointment_id: row.get("appointment_id"),
                qr_code: row.get("qr_code"),
                pdf_path: row.get("pdf_path"),
                status: row.get("status"),
                is_active: row.get("is_active"),
                valid_from: row.get("valid_from"),
                valid_to: row.get("valid_to"),
                issued_by: row.get("issued_by"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            };
            let visitor = row.get::<Option<i32>, _>("v_id").map(|vid| VisitorShort {
                id: vid,
                name: row.get("v_name"),
                email: row.get("v_email"),
                phone: row.get("v_phone"),
            });
            let appointment = row
                .get::<Option<i32>, _>("a_id")
                .map(|aid| AppointmentShort {
                    id: aid,
                    status: row.get("a_status"),
                    scheduled_date: row.get("a_scheduled_date"),
                });
            let issued_by_user = row.get::<Option<i32>, _>("u_id").map(|uid| UserShort {
                id: uid,
                name: row.get("u_name"),
                email: row.get("u_email"),
                role: row.get("u_role"),
            });
            result.push(PassDetails {
                pass,
                visitor,
                appointment,
                issued_by_user,
            });
        }

        Ok(result)
    }
}
