use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::employee::models::EmployeeId;
use crate::domain::records::errors::RecordsError;
use crate::domain::records::models::AttendanceEntry;
use crate::domain::records::models::LeaveBalance;
use crate::domain::records::models::LeaveRequest;
use crate::domain::records::models::Timesheet;
use crate::domain::records::ports::RecordsRepository;

pub struct PostgresRecordsRepository {
    pool: PgPool,
}

impl PostgresRecordsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: impl std::fmt::Display) -> RecordsError {
    RecordsError::DatabaseError(e.to_string())
}

fn attendance_from_row(row: &PgRow) -> Result<AttendanceEntry, RecordsError> {
    Ok(AttendanceEntry {
        id: row.try_get("id").map_err(db_err)?,
        employee_id: EmployeeId(row.try_get("employee_id").map_err(db_err)?),
        date: row.try_get("date").map_err(db_err)?,
        status: row.try_get("status").map_err(db_err)?,
        check_in: row.try_get("check_in").map_err(db_err)?,
        check_out: row.try_get("check_out").map_err(db_err)?,
    })
}

fn leave_from_row(row: &PgRow) -> Result<LeaveRequest, RecordsError> {
    Ok(LeaveRequest {
        id: row.try_get("id").map_err(db_err)?,
        employee_id: EmployeeId(row.try_get("employee_id").map_err(db_err)?),
        from_date: row.try_get("from_date").map_err(db_err)?,
        to_date: row.try_get("to_date").map_err(db_err)?,
        kind: row.try_get("kind").map_err(db_err)?,
        status: row.try_get("status").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

fn timesheet_from_row(row: &PgRow) -> Result<Timesheet, RecordsError> {
    Ok(Timesheet {
        id: row.try_get("id").map_err(db_err)?,
        employee_id: EmployeeId(row.try_get("employee_id").map_err(db_err)?),
        week_start: row.try_get("week_start").map_err(db_err)?,
        hours: row.try_get("hours").map_err(db_err)?,
        total_hours: row.try_get("total_hours").map_err(db_err)?,
        status: row.try_get("status").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl RecordsRepository for PostgresRecordsRepository {
    async fn list_attendance(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<AttendanceEntry>, RecordsError> {
        let rows = sqlx::query(
            r#"
            SELECT id, employee_id, date, status, check_in, check_out
            FROM attendance
            WHERE employee_id = $1
            ORDER BY date DESC
            "#,
        )
        .bind(employee_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(attendance_from_row).collect()
    }

    async fn insert_attendance(
        &self,
        entry: AttendanceEntry,
    ) -> Result<AttendanceEntry, RecordsError> {
        sqlx::query(
            r#"
            INSERT INTO attendance (id, employee_id, date, status, check_in, check_out)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.id)
        .bind(entry.employee_id.0)
        .bind(entry.date)
        .bind(&entry.status)
        .bind(&entry.check_in)
        .bind(&entry.check_out)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return RecordsError::AlreadyMarked;
                }
            }
            RecordsError::DatabaseError(e.to_string())
        })?;

        Ok(entry)
    }

    async fn list_leave(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<LeaveRequest>, RecordsError> {
        let rows = sqlx::query(
            r#"
            SELECT id, employee_id, from_date, to_date, kind, status, created_at
            FROM leave_request
            WHERE employee_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(employee_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(leave_from_row).collect()
    }

    async fn insert_leave(&self, request: LeaveRequest) -> Result<LeaveRequest, RecordsError> {
        sqlx::query(
            r#"
            INSERT INTO leave_request (id, employee_id, from_date, to_date, kind, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(request.id)
        .bind(request.employee_id.0)
        .bind(request.from_date)
        .bind(request.to_date)
        .bind(&request.kind)
        .bind(&request.status)
        .bind(request.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(request)
    }

    async fn find_balance(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Option<LeaveBalance>, RecordsError> {
        let row = sqlx::query(
            r#"
            SELECT employee_id, total_days, used_days
            FROM leave_balance
            WHERE employee_id = $1
            "#,
        )
        .bind(employee_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(|row| {
            Ok(LeaveBalance {
                employee_id: EmployeeId(row.try_get("employee_id").map_err(db_err)?),
                total_days: row.try_get("total_days").map_err(db_err)?,
                used_days: row.try_get("used_days").map_err(db_err)?,
            })
        })
        .transpose()
    }

    async fn list_timesheets(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<Timesheet>, RecordsError> {
        let rows = sqlx::query(
            r#"
            SELECT id, employee_id, week_start, hours, total_hours, status, created_at
            FROM timesheet
            WHERE employee_id = $1
            ORDER BY week_start DESC
            "#,
        )
        .bind(employee_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(timesheet_from_row).collect()
    }

    async fn insert_timesheet(&self, timesheet: Timesheet) -> Result<Timesheet, RecordsError> {
        sqlx::query(
            r#"
            INSERT INTO timesheet (id, employee_id, week_start, hours, total_hours, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(timesheet.id)
        .bind(timesheet.employee_id.0)
        .bind(timesheet.week_start)
        .bind(&timesheet.hours)
        .bind(timesheet.total_hours)
        .bind(&timesheet.status)
        .bind(timesheet.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(timesheet)
    }
}
