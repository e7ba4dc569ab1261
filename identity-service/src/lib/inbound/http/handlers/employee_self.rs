use auth::Role;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::linked_employee_id;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::employee::models::Employee;
use crate::domain::policy;
use crate::inbound::http::middleware::CurrentPrincipal;
use crate::inbound::http::router::AppState;

/// Self-scoped profile endpoint. The employee id comes from the session
/// claim; clients cannot ask for anyone else's record here.
pub async fn my_profile(
    State(state): State<AppState>,
    CurrentPrincipal(claim): CurrentPrincipal,
) -> Result<ApiSuccess<MyProfileResponseData>, ApiError> {
    policy::require_role(&claim, &[Role::Employee])?;

    let employee_id = linked_employee_id(&claim)?;

    state
        .employee_service
        .get_employee(&employee_id)
        .await
        .map_err(ApiError::from)
        .map(|ref employee| ApiSuccess::new(StatusCode::OK, employee.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MyProfileResponseData {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Employee> for MyProfileResponseData {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id.to_string(),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            email: employee.email.as_str().to_string(),
            status: employee.status.to_string(),
            created_at: employee.created_at,
        }
    }
}
