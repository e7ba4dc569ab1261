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
use crate::domain::records::models::AttendanceEntry;
use crate::domain::records::models::MarkAttendanceCommand;
use crate::inbound::http::middleware::CurrentPrincipal;
use crate::inbound::http::router::AppState;

pub async fn my_attendance(
    State(state): State<AppState>,
    CurrentPrincipal(claim): CurrentPrincipal,
) -> Result<ApiSuccess<Vec<AttendanceData>>, ApiError> {
    policy::require_role(&claim, &[Role::Employee])?;
    let employee_id = linked_employee_id(&claim)?;

    state
        .records_service
        .my_attendance(employee_id)
        .await
        .map_err(ApiError::from)
        .map(|entries| {
            ApiSuccess::new(
                StatusCode::OK,
                entries.iter().map(AttendanceData::from).collect(),
            )
        })
}

pub async fn mark_my_attendance(
    State(state): State<AppState>,
    CurrentPrincipal(claim): CurrentPrincipal,
    Json(body): Json<MarkAttendanceRequest>,
) -> Result<ApiSuccess<AttendanceData>, ApiError> {
    policy::require_role(&claim, &[Role::Employee])?;
    let employee_id = linked_employee_id(&claim)?;

    state
        .records_service
        .mark_attendance(
            employee_id,
            MarkAttendanceCommand {
                status: body.status,
                check_in: body.check_in,
                check_out: body.check_out,
            },
        )
        .await
        .map_err(ApiError::from)
        .map(|ref entry| ApiSuccess::new(StatusCode::CREATED, entry.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarkAttendanceRequest {
    status: String,
    check_in: Option<String>,
    check_out: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceData {
    pub id: String,
    pub date: NaiveDate,
    pub status: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

impl From<&AttendanceEntry> for AttendanceData {
    fn from(entry: &AttendanceEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            date: entry.date,
            status: entry.status.clone(),
            check_in: entry.check_in.clone(),
            check_out: entry.check_out.clone(),
        }
    }
}
