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
use crate::domain::records::models::ApplyLeaveCommand;
use crate::domain::records::models::LeaveBalance;
use crate::domain::records::models::LeaveRequest;
use crate::inbound::http::middleware::CurrentPrincipal;
use crate::inbound::http::router::AppState;

pub async fn my_leave(
    State(state): State<AppState>,
    CurrentPrincipal(claim): CurrentPrincipal,
) -> Result<ApiSuccess<Vec<LeaveRequestData>>, ApiError> {
    policy::require_role(&claim, &[Role::Employee])?;
    let employee_id = linked_employee_id(&claim)?;

    state
        .records_service
        .my_leave(employee_id)
        .await
        .map_err(ApiError::from)
        .map(|requests| {
            ApiSuccess::new(
                StatusCode::OK,
                requests.iter().map(LeaveRequestData::from).collect(),
            )
        })
}

pub async fn apply_my_leave(
    State(state): State<AppState>,
    CurrentPrincipal(claim): CurrentPrincipal,
    Json(body): Json<ApplyLeaveRequest>,
) -> Result<ApiSuccess<LeaveRequestData>, ApiError> {
    policy::require_role(&claim, &[Role::Employee])?;
    let employee_id = linked_employee_id(&claim)?;

    state
        .records_service
        .apply_leave(
            employee_id,
            ApplyLeaveCommand {
                from_date: body.from_date,
                to_date: body.to_date,
                kind: body.kind,
            },
        )
        .await
        .map_err(ApiError::from)
        .map(|ref request| ApiSuccess::new(StatusCode::CREATED, request.into()))
}

pub async fn my_leave_balance(
    State(state): State<AppState>,
    CurrentPrincipal(claim): CurrentPrincipal,
) -> Result<ApiSuccess<LeaveBalanceData>, ApiError> {
    policy::require_role(&claim, &[Role::Employee])?;
    let employee_id = linked_employee_id(&claim)?;

    state
        .records_service
        .my_balance(employee_id)
        .await
        .map_err(ApiError::from)
        .map(|ref balance| ApiSuccess::new(StatusCode::OK, balance.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApplyLeaveRequest {
    from_date: NaiveDate,
    to_date: NaiveDate,
    kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveRequestData {
    pub id: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub kind: String,
    pub status: String,
}

impl From<&LeaveRequest> for LeaveRequestData {
    fn from(request: &LeaveRequest) -> Self {
        Self {
            id: request.id.to_string(),
            from_date: request.from_date,
            to_date: request.to_date,
            kind: request.kind.clone(),
            status: request.status.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveBalanceData {
    pub total_days: f64,
    pub used_days: f64,
    pub remaining_days: f64,
}

impl From<&LeaveBalance> for LeaveBalanceData {
    fn from(balance: &LeaveBalance) -> Self {
        Self {
            total_days: balance.total_days,
            used_days: balance.used_days,
            remaining_days: balance.remaining_days(),
        }
    }
}
