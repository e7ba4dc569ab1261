use auth::Role;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use super::linked_employee_id;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::policy;
use crate::domain::records::models::SubmitTimesheetCommand;
use crate::domain::records::models::Timesheet;
use crate::inbound::http::middleware::CurrentPrincipal;
use crate::inbound::http::router::AppState;

pub async fn my_timesheets(
    State(state): State<AppState>,
    CurrentPrincipal(claim): CurrentPrincipal,
) -> Result<ApiSuccess<Vec<TimesheetData>>, ApiError> {
    policy::require_role(&claim, &[Role::Employee])?;
    let employee_id = linked_employee_id(&claim)?;

    state
        .records_service
        .my_timesheets(employee_id)
        .await
        .map_err(ApiError::from)
        .map(|timesheets| {
            ApiSuccess::new(
                StatusCode::OK,
                timesheets.iter().map(TimesheetData::from).collect(),
            )
        })
}

pub async fn submit_my_timesheet(
    State(state): State<AppState>,
    CurrentPrincipal(claim): CurrentPrincipal,
    Json(body): Json<SubmitTimesheetRequest>,
) -> Result<ApiSuccess<TimesheetData>, ApiError> {
    policy::require_role(&claim, &[Role::Employee])?;
    let employee_id = linked_employee_id(&claim)?;

    state
        .records_service
        .submit_timesheet(
            employee_id,
            SubmitTimesheetCommand {
                week_start: body.week_start,
                hours: body.hours,
            },
        )
        .await
        .map_err(ApiError::from)
        .map(|ref timesheet| ApiSuccess::new(StatusCode::CREATED, timesheet.into()))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmitTimesheetRequest {
    week_start: NaiveDate,
    hours: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimesheetData {
    pub id: String,
    pub week_start: NaiveDate,
    pub hours: Vec<f64>,
    pub total_hours: f64,
    pub status: String,
}

impl From<&Timesheet> for TimesheetData {
    fn from(timesheet: &Timesheet) -> Self {
        Self {
            id: timesheet.id.to_string(),
            week_start: timesheet.week_start,
            hours: timesheet.hours.clone(),
            total_hours: timesheet.total_hours,
            status: timesheet.status.clone(),
        }
    }
}
