use auth::Role;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::employee::errors::EmailError;
use crate::domain::employee::models::CreateEmployeeCommand;
use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::Employee;
use crate::domain::policy;
use crate::inbound::http::middleware::CurrentPrincipal;
use crate::inbound::http::router::AppState;

pub async fn create_employee(
    State(state): State<AppState>,
    CurrentPrincipal(claim): CurrentPrincipal,
    Json(body): Json<CreateEmployeeRequest>,
) -> Result<ApiSuccess<CreateEmployeeResponseData>, ApiError> {
    policy::require_role(&claim, &[Role::HrManager, Role::Admin])?;

    state
        .employee_service
        .create_employee(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref employee| ApiSuccess::new(StatusCode::CREATED, employee.into()))
}

/// HTTP request body for creating an employee (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateEmployeeRequest {
    first_name: String,
    last_name: String,
    email: String,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateEmployeeRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

impl CreateEmployeeRequest {
    fn try_into_command(self) -> Result<CreateEmployeeCommand, ParseCreateEmployeeRequestError> {
        let email = EmailAddress::new(self.email)?;
        Ok(CreateEmployeeCommand {
            first_name: self.first_name,
            last_name: self.last_name,
            email,
        })
    }
}

impl From<ParseCreateEmployeeRequestError> for ApiError {
    fn from(err: ParseCreateEmployeeRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateEmployeeResponseData {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Employee> for CreateEmployeeResponseData {
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
