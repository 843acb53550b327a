//! Visitors repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        user::UserShort,
        visitor::{CreateVisitor, Visitor, VisitorDetails, VisitorShort},
    },
};

#[derive(Clone)]
pub struct VisitorsRepository {
    pool: Pool<Postgres>,
}

impl VisitorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get visitor by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Visitor> {
        sqlx::query_as::<_, Visitor>("SELECT * FROM visitors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Visitor with id {} not found", id)))
    }

    /// Get short representation for embedding
    pub async fn get_short(&self, id: i32) -> AppResult<Option<VisitorShort>> {
        let visitor = sqlx::query_as::<_, VisitorShort>(
            "SELECT id, name, email, phone FROM visitors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(visitor)
    }

    /// Create a new visitor
    pub async fn create(&self, visitor: &CreateVisitor, created_by: i32) -> AppResult<Visitor> {
        let row = sqlx::query_as::<_, Visitor>(
            r#"
            INSERT INTO visitors (name, email, phone, photo, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&visitor.name)
        .bind(&visitor.email)
        .bind(&visitor.phone)
        .bind(&visitor.photo)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// List all visitors with their creator resolved
    pub async fn list(&self) -> AppResult<Vec<VisitorDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT v.*, u.id as u_id, u.name as u_name, u.email as u_email, u.role as u_role
            FROM visitors v
            LEFT JOIN users u ON v.created_by = u.id
            ORDER BY v.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let visitor = Visitor {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
                phone: row.get("phone"),
                photo: row.get("photo"),
                created_by: row.get("created_by"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            };
            let created_by_user = row.get::<Option<i32>, _>("u_id").map(|uid| UserShort {
                id: uid,
                name: row.get("u_name"),
                email: row.get("u_email"),
                role: row.get("u_role"),
            });
            result.push(VisitorDetails {
                visitor,
                created_by_user,
            });
        }

        Ok(result)
    }
}
