use auth::SessionClaim;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::models::EmployeeId;
use crate::domain::identity::errors::IdentityError;
use crate::domain::policy::PolicyError;
use crate::domain::records::errors::RecordsError;
use crate::domain::token::errors::TokenError;

pub mod attendance_self;
pub mod create_employee;
pub mod employee_self;
pub mod leave_self;
pub mod login;
pub mod set_password;
pub mod timesheet_self;
pub mod validate_token;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

/// Storage-level detail stays in the logs; clients get a generic body.
fn internal(context: &str, detail: impl std::fmt::Display) -> ApiError {
    tracing::error!(context, error = %detail, "Internal error");
    ApiError::InternalServerError("Internal server error".to_string())
}

/// Employee id for self-scoped endpoints, always derived from the claim.
pub(crate) fn linked_employee_id(claim: &SessionClaim) -> Result<EmployeeId, ApiError> {
    claim.employee_id.map(EmployeeId).ok_or_else(|| {
        ApiError::Forbidden("No employee record linked to this account".to_string())
    })
}

impl From<EmployeeError> for ApiError {
    fn from(err: EmployeeError) -> Self {
        match err {
            EmployeeError::NotFound(_) => ApiError::NotFound(err.to_string()),
            EmployeeError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            EmployeeError::InvalidId(_) | EmployeeError::InvalidEmail(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            EmployeeError::DatabaseError(_) => internal("employee", err),
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidCredentials | IdentityError::AccountInactive => {
                ApiError::Unauthorized(err.to_string())
            }
            IdentityError::EmployeeNotFound(_) => ApiError::NotFound(err.to_string()),
            IdentityError::EmailTaken(_)
            | IdentityError::Issuance(_)
            | IdentityError::Session(_)
            | IdentityError::DatabaseError(_) => internal("identity", err),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::TokenInvalid => ApiError::BadRequest(err.to_string()),
            TokenError::WeakPassword { .. } => ApiError::UnprocessableEntity(err.to_string()),
            TokenError::Hashing(_) | TokenError::DatabaseError(_) => internal("token", err),
        }
    }
}

impl From<RecordsError> for ApiError {
    fn from(err: RecordsError) -> Self {
        match err {
            RecordsError::AlreadyMarked => ApiError::BadRequest(err.to_string()),
            RecordsError::InvalidLeaveRange => ApiError::UnprocessableEntity(err.to_string()),
            RecordsError::DatabaseError(_) => internal("records", err),
        }
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::Unauthenticated => ApiError::Unauthorized(err.to_string()),
            PolicyError::Forbidden => ApiError::Forbidden(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}
