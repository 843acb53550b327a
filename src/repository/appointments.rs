//! Appointments repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        appointment::{
            Appointment, AppointmentDetails, AppointmentQuery, AppointmentStatus,
            CreateAppointment,
        },
        user::UserShort,
        visitor::VisitorShort,
    },
};

#[derive(Clone)]
pub struct AppointmentsRepository {
    pool: Pool<Postgres>,
}

impl AppointmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get appointment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Appointment> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment with id {} not found", id)))
    }

    /// Create a new appointment (status starts as pending)
    pub async fn create(
        &self,
        appointment: &CreateAppointment,
        host_id: i32,
    ) -> AppResult<Appointment> {
        let row = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (visitor_id, host_id, status, scheduled_date, notes)
            VALUES ($1, $2, 'pending', $3, $4)
            RETURNING *
            "#,
        )
        .bind(appointment.visitor_id)
        .bind(host_id)
        .bind(appointment.scheduled_date)
        .bind(&appointment.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Update appointment status
    pub async fn set_status(&self, id: i32, status: AppointmentStatus) -> AppResult<Appointment> {
        let row = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Appointment with id {} not found", id)))?;

        Ok(row)
    }

    /// Delete an appointment
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Appointment with id {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Get appointment with visitor and host resolved
    pub async fn get_details(&self, id: i32) -> AppResult<AppointmentDetails> {
        let details = self
            .fetch_details(Some(id), &AppointmentQuery::default())
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Appointment with id {} not found", id)))?;
        Ok(details)
    }

    /// List appointments with visitor and host resolved, newest first
    pub async fn list(&self, query: &AppointmentQuery) -> AppResult<Vec<AppointmentDetails>> {
        self.fetch_details(None, query).await
    }

    async fn fetch_details(
        &self,
        id: Option<i32>,
        query: &AppointmentQuery,
    ) -> AppResult<Vec<AppointmentDetails>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if id.is_some() {
            conditions.push(format!("a.id = ${}", idx));
            idx += 1;
        }
        if query.status.is_some() {
            conditions.push(format!("a.status = ${}", idx));
            idx += 1;
        }
        if query.date.is_some() {
            conditions.push(format!("a.scheduled_date >= ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            r#"
            SELECT a.*,
                   v.id as v_id, v.name as v_name, v.email as v_email, v.phone as v_phone,
                   u.id as u_id, u.name as u_name, u.email as u_email, u.role as u_role
            FROM appointments a
            LEFT JOIN visitors v ON a.visitor_id = v.id
            LEFT JOIN users u ON a.host_id = u.id
            {}
            ORDER BY a.scheduled_date DESC
            "#,
            where_clause
        );

        let mut builder = sqlx::query(&sql);
        if let Some(id) = id {
            builder = builder.bind(id);
        }
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }
        if let Some(date) = query.date {
            builder = builder.bind(date);
        }

        let rows = builder.fetch_all(&self.pool).await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let appointment = Appointment {
                id: row.get("id"),
                visitor_id: row.get("visitor_id"),
                host_id: row.get("host_id"),
                status: row.get("status"),
                scheduled_date: row.get("scheduled_date"),
                notes: row.get("notes"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            };
            let visitor = row.get::<Option<i32>, _>("v_id").map(|vid| VisitorShort {
                id: vid,
                name: row.get("v_name"),
                email: row.get("v_email"),
                phone: row.get("v_phone"),
            });
            let host = row.get::<Option<i32>, _>("u_id").map(|uid| UserShort {
                id: uid,
                name: row.get("u_name"),
                email: row.get("u_email"),
                role: row.get("u_role"),
            });
            result.push(AppointmentDetails {
                appointment,
                visitor,
                host,
            });
        }

        Ok(result)
    }
}
