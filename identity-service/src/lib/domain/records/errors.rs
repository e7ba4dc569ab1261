use thiserror::Error;

/// Top-level error for self-service record operations
#[derive(Debug, Clone, Error)]
pub enum RecordsError {
    #[error("Attendance already marked for today")]
    AlreadyMarked,

    #[error("Leave range is invalid: from date is after to date")]
    InvalidLeaveRange,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
