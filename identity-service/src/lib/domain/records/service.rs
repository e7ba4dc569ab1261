use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::employee::models::EmployeeId;
use crate::domain::records::errors::RecordsError;
use crate::domain::records::models::ApplyLeaveCommand;
use crate::domain::records::models::AttendanceEntry;
use crate::domain::records::models::LeaveBalance;
use crate::domain::records::models::LeaveRequest;
use crate::domain::records::models::MarkAttendanceCommand;
use crate::domain::records::models::SubmitTimesheetCommand;
use crate::domain::records::models::Timesheet;
use crate::domain::records::models::LEAVE_STATUS_PENDING;
use crate::domain::records::models::TIMESHEET_STATUS_SUBMITTED;
use crate::domain::records::ports::RecordsRepository;
use crate::domain::records::ports::RecordsServicePort;

/// Self-service record operations, scoped per employee.
pub struct RecordsService<RR>
where
    RR: RecordsRepository,
{
    repository: Arc<RR>,
}

impl<RR> RecordsService<RR>
where
    RR: RecordsRepository,
{
    pub fn new(repository: Arc<RR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<RR> RecordsServicePort for RecordsService<RR>
where
    RR: RecordsRepository,
{
    async fn my_attendance(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<AttendanceEntry>, RecordsError> {
        self.repository.list_attendance(&employee_id).await
    }

    async fn mark_attendance(
        &self,
        employee_id: EmployeeId,
        command: MarkAttendanceCommand,
    ) -> Result<AttendanceEntry, RecordsError> {
        let entry = AttendanceEntry {
            id: Uuid::new_v4(),
            employee_id,
            // The server decides what "today" is, not the client.
            date: Utc::now().date_naive(),
            status: command.status,
            check_in: command.check_in,
            check_out: command.check_out,
        };

        self.repository.insert_attendance(entry).await
    }

    async fn my_leave(&self, employee_id: EmployeeId) -> Result<Vec<LeaveRequest>, RecordsError> {
        self.repository.list_leave(&employee_id).await
    }

    async fn apply_leave(
        &self,
        employee_id: EmployeeId,
        command: ApplyLeaveCommand,
    ) -> Result<LeaveRequest, RecordsError> {
        if command.from_date > command.to_date {
            return Err(RecordsError::InvalidLeaveRange);
        }

        let request = LeaveRequest {
            id: Uuid::new_v4(),
            employee_id,
            from_date: command.from_date,
            to_date: command.to_date,
            kind: command.kind,
            status: LEAVE_STATUS_PENDING.to_string(),
            created_at: Utc::now(),
        };

        self.repository.insert_leave(request).await
    }

    async fn my_balance(&self, employee_id: EmployeeId) -> Result<LeaveBalance, RecordsError> {
        Ok(self
            .repository
            .find_balance(&employee_id)
            .await?
            .unwrap_or_else(|| LeaveBalance::empty(employee_id)))
    }

    async fn my_timesheets(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<Timesheet>, RecordsError> {
        self.repository.list_timesheets(&employee_id).await
    }

    async fn submit_timesheet(
        &self,
        employee_id: EmployeeId,
        command: SubmitTimesheetCommand,
    ) -> Result<Timesheet, RecordsError> {
        let total_hours = command.hours.iter().sum();

        let timesheet = Timesheet {
            id: Uuid::new_v4(),
            employee_id,
            week_start: command.week_start,
            hours: command.hours,
            total_hours,
            status: TIMESHEET_STATUS_SUBMITTED.to_string(),
            created_at: Utc::now(),
        };

        self.repository.insert_timesheet(timesheet).await
    }
}
