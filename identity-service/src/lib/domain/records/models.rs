//! Thin self-service records: attendance, leave and timesheets.
//!
//! These exist so the authorization layers have a real surface to protect;
//! every read and write is scoped to the employee id carried by the session
//! claim, never to a client-supplied id. The richer HR semantics (approval
//! chains, balance accrual, period locking) live outside this service.

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::employee::models::EmployeeId;

pub const LEAVE_STATUS_PENDING: &str = "PENDING";
pub const TIMESHEET_STATUS_SUBMITTED: &str = "SUBMITTED";

/// One attendance mark; at most one per employee and day.
#[derive(Debug, Clone)]
pub struct AttendanceEntry {
    pub id: Uuid,
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub status: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: EmployeeId,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub kind: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct LeaveBalance {
    pub employee_id: EmployeeId,
    pub total_days: f64,
    pub used_days: f64,
}

impl LeaveBalance {
    /// Empty balance for employees with no allocation yet.
    pub fn empty(employee_id: EmployeeId) -> Self {
        Self {
            employee_id,
            total_days: 0.0,
            used_days: 0.0,
        }
    }

    pub fn remaining_days(&self) -> f64 {
        self.total_days - self.used_days
    }
}

#[derive(Debug, Clone)]
pub struct Timesheet {
    pub id: Uuid,
    pub employee_id: EmployeeId,
    pub week_start: NaiveDate,
    /// Hours per day for the week.
    pub hours: Vec<f64>,
    pub total_hours: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Command to mark today's attendance.
#[derive(Debug)]
pub struct MarkAttendanceCommand {
    pub status: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

/// Command to apply for leave.
#[derive(Debug)]
pub struct ApplyLeaveCommand {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub kind: String,
}

/// Command to submit a weekly timesheet.
#[derive(Debug)]
pub struct SubmitTimesheetCommand {
    pub week_start: NaiveDate,
    pub hours: Vec<f64>,
}
