use async_trait::async_trait;

use crate::domain::employee::models::EmployeeId;
use crate::domain::records::errors::RecordsError;
use crate::domain::records::models::ApplyLeaveCommand;
use crate::domain::records::models::AttendanceEntry;
use crate::domain::records::models::LeaveBalance;
use crate::domain::records::models::LeaveRequest;
use crate::domain::records::models::MarkAttendanceCommand;
use crate::domain::records::models::SubmitTimesheetCommand;
use crate::domain::records::models::Timesheet;

/// Port for self-service record operations.
///
/// The employee id always comes from the caller's session claim; handlers
/// never accept one from the request.
#[async_trait]
pub trait RecordsServicePort: Send + Sync + 'static {
    async fn my_attendance(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<AttendanceEntry>, RecordsError>;

    /// Mark today's attendance.
    ///
    /// # Errors
    /// * `AlreadyMarked` - An entry for today already exists
    async fn mark_attendance(
        &self,
        employee_id: EmployeeId,
        command: MarkAttendanceCommand,
    ) -> Result<AttendanceEntry, RecordsError>;

    async fn my_leave(&self, employee_id: EmployeeId) -> Result<Vec<LeaveRequest>, RecordsError>;

    /// File a leave request; it starts in `PENDING`.
    ///
    /// # Errors
    /// * `InvalidLeaveRange` - from date after to date
    async fn apply_leave(
        &self,
        employee_id: EmployeeId,
        command: ApplyLeaveCommand,
    ) -> Result<LeaveRequest, RecordsError>;

    /// Current leave balance; employees without an allocation get an empty one.
    async fn my_balance(&self, employee_id: EmployeeId) -> Result<LeaveBalance, RecordsError>;

    async fn my_timesheets(&self, employee_id: EmployeeId)
        -> Result<Vec<Timesheet>, RecordsError>;

    /// Submit a weekly timesheet; total hours are derived server-side.
    async fn submit_timesheet(
        &self,
        employee_id: EmployeeId,
        command: SubmitTimesheetCommand,
    ) -> Result<Timesheet, RecordsError>;
}

/// Persistence operations for self-service records.
#[async_trait]
pub trait RecordsRepository: Send + Sync + 'static {
    async fn list_attendance(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<AttendanceEntry>, RecordsError>;

    /// Insert an attendance entry.
    ///
    /// # Errors
    /// * `AlreadyMarked` - Uniqueness on (employee, date) violated
    async fn insert_attendance(
        &self,
        entry: AttendanceEntry,
    ) -> Result<AttendanceEntry, RecordsError>;

    async fn list_leave(&self, employee_id: &EmployeeId)
        -> Result<Vec<LeaveRequest>, RecordsError>;

    async fn insert_leave(&self, request: LeaveRequest) -> Result<LeaveRequest, RecordsError>;

    async fn find_balance(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Option<LeaveBalance>, RecordsError>;

    async fn list_timesheets(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Vec<Timesheet>, RecordsError>;

    async fn insert_timesheet(&self, timesheet: Timesheet) -> Result<Timesheet, RecordsError>;
}
