//! Check logs repository for database operations
//!
//! The at-most-one-open-log-per-pass invariant lives here: inserts race
//! against a partial unique index (`pass_id WHERE check_out_time IS NULL`)
//! instead of an application-level query-then-write, and checkout closes
//! the open log with a single conditional UPDATE.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        check_log::{CheckLog, CheckLogDetails, CheckLogQuery, CheckLogStatus, HourlyCount},
        visitor::VisitorShort,
    },
};

/// Postgres unique_violation SQLSTATE
const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

#[derive(Clone)]
pub struct CheckLogsRepository {
    pool: Pool<Postgres>,
}

impl CheckLogsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert an open check log for a pass.
    ///
    /// Returns `Ok(None)` when another open log already exists for the pass
    /// (unique index conflict), so the caller can treat the duplicate scan
    /// as an idempotent success.
    pub async fn insert_open(
        &self,
        pass_id: Uuid,
        visitor_id: i32,
        scanned_by: i32,
        location: &str,
    ) -> AppResult<Option<CheckLog>> {
        let result = sqlx::query_as::<_, CheckLog>(
            r#"
            INSERT INTO check_logs (pass_id, visitor_id, scanned_by, check_in_time, location)
            VALUES ($1, $2, $3, NOW(), $4)
            RETURNING *
            "#,
        )
        .bind(pass_id)
        .bind(visitor_id)
        .bind(scanned_by)
        .bind(location)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(log) => Ok(Some(log)),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Find the open (not yet checked out) log for a pass, if any
    pub async fn find_open_by_pass(&self, pass_id: Uuid) -> AppResult<Option<CheckLog>> {
        let log = sqlx::query_as::<_, CheckLog>(
            "SELECT * FROM check_logs WHERE pass_id = $1 AND check_out_time IS NULL",
        )
        .bind(pass_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(log)
    }

    /// Close the open log for a pass, setting checkout time and duration
    /// in whole minutes. Atomic: a concurrent checkout sees zero rows.
    pub async fn close_open(&self, pass_id: Uuid) -> AppResult<Option<CheckLog>> {
        let log = sqlx::query_as::<_, CheckLog>(
            r#"
            UPDATE check_logs
            SET check_out_time = NOW(),
                duration_minutes = CAST(ROUND(EXTRACT(EPOCH FROM (NOW() - check_in_time)) / 60.0) AS INT)
            WHERE pass_id = $1 AND check_out_time IS NULL
            RETURNING *
            "#,
        )
        .bind(pass_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(log)
    }

    /// Get a single check log with details
    pub async fn get_details_by_id(&self, id: i32) -> AppResult<CheckLogDetails> {
        let sql = format!("{} WHERE cl.id = $1", DETAILS_SELECT);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Check log with id {} not found", id)))?;
        Ok(map_details_row(&row))
    }

    /// List check logs with optional filters, newest check-in first
    pub async fn list(&self, query: &CheckLogQuery) -> AppResult<Vec<CheckLogDetails>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.start_date.is_some() {
            conditions.push(format!("cl.check_in_time >= ${}", idx));
            idx += 1;
        }
        if query.end_date.is_some() {
            // End date is inclusive of the whole day
            conditions.push(format!("cl.check_in_time < ${}", idx));
            idx += 1;
        }
        if query.visitor.is_some() {
            conditions.push(format!("cl.visitor_id = ${}", idx));
        }
        match query.status {
            Some(CheckLogStatus::Active) => conditions.push("cl.check_out_time IS NULL".into()),
            Some(CheckLogStatus::Completed) => {
                conditions.push("cl.check_out_time IS NOT NULL".into())
            }
            None => {}
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "{} {} ORDER BY cl.check_in_time DESC",
            DETAILS_SELECT, where_clause
        );

        let mut builder = sqlx::query(&sql);
        if let Some(sd) = query.start_date {
            builder = builder.bind(sd.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc());
        }
        if let Some(ed) = query.end_date {
            let next_day = ed.succ_opt().unwrap_or(ed);
            builder = builder.bind(next_day.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc());
        }
        if let Some(visitor) = query.visitor {
            builder = builder.bind(visitor);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map_details_row).collect())
    }

    /// List logs with check-in at or after the given instant, newest first
    pub async fn list_since(&self, since: DateTime<Utc>) -> AppResult<Vec<CheckLogDetails>> {
        let sql = format!(
            "{} WHERE cl.check_in_time >= $1 ORDER BY cl.check_in_time DESC",
            DETAILS_SELECT
        );
        let rows = sqlx::query(&sql).bind(since).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map_details_row).collect())
    }

    /// Last `limit` logs for a visitor, newest first
    pub async fn visitor_history(
        &self,
        visitor_id: i32,
        limit: i64,
    ) -> AppResult<Vec<CheckLogDetails>> {
        let sql = format!(
            "{} WHERE cl.visitor_id = $1 ORDER BY cl.check_in_time DESC LIMIT $2",
            DETAILS_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(visitor_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_details_row).collect())
    }

    /// Count logs with check-in at or after the given instant
    pub async fn count_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM check_logs WHERE check_in_time >= $1")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count still-open logs with check-in at or after the given instant
    pub async fn count_active_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM check_logs WHERE check_in_time >= $1 AND check_out_time IS NULL",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Check-ins bucketed by hour of day, for logs since the given instant
    pub async fn hourly_distribution(&self, since: DateTime<Utc>) -> AppResult<Vec<HourlyCount>> {
        let rows = sqlx::query(
            r#"
            SELECT CAST(EXTRACT(HOUR FROM check_in_time) AS INT) as hour, COUNT(*) as count
            FROM check_logs
            WHERE check_in_time >= $1
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| HourlyCount {
                hour: row.get("hour"),
                count: row.get("count"),
            })
            .collect())
    }
}

const DETAILS_SELECT: &str = r#"
    SELECT cl.*,
           v.id as v_id, v.name as v_name, v.email as v_email, v.phone as v_phone,
           u.name as officer_name,
           p.valid_from as p_valid_from, p.valid_to as p_valid_to
    FROM check_logs cl
    LEFT JOIN visitors v ON cl.visitor_id = v.id
    LEFT JOIN users u ON cl.scanned_by = u.id
    LEFT JOIN passes p ON cl.pass_id = p.id
"#;

fn map_details_row(row: &sqlx::postgres::PgRow) -> CheckLogDetails {
    let log = CheckLog {
        id: row.get("id"),
        pass_id: row.get("pass_id"),
        visitor_id: row.get("visitor_id"),
        scanned_by: row.get("scanned_by"),
        check_in_time: row.get("check_in_time"),
        check_out_time: row.get("check_out_time"),
        location: row.get("location"),
        duration_minutes: row.get("duration_minutes"),
    };
    let visitor = row.get::<Option<i32>, _>("v_id").map(|vid| VisitorShort {
        id: vid,
        name: row.get("v_name"),
        email: row.get("v_email"),
        phone: row.get("v_phone"),
    });
    CheckLogDetails {
        log,
        visitor,
        officer_name: row.get("officer_name"),
        pass_valid_from: row.get("p_valid_from"),
        pass_valid_to: row.get("p_valid_to"),
    }
}
