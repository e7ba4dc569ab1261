use thiserror::Error;

/// Error for EmployeeId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmployeeIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for EmployeeStatus parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmployeeStatusError {
    #[error("Unknown employee status: {0}")]
    Unknown(String),
}

/// Top-level error for employee operations
#[derive(Debug, Clone, Error)]
pub enum EmployeeError {
    #[error("Invalid employee ID: {0}")]
    InvalidId(#[from] EmployeeIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Employee not found: {0}")]
    NotFound(String),

    #[error("Employee email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
