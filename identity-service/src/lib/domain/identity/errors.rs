use thiserror::Error;

/// Error for IdentityId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for identity operations
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// Unknown email, wrong password and verifier failures all collapse here.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Surfaced distinctly from `InvalidCredentials` on purpose; see DESIGN.md
    /// for the enumeration trade-off this carries.
    #[error("Please set your password before logging in.")]
    AccountInactive,

    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    /// Unique-email violation on create; the backstop for provisioning races.
    #[error("Identity already exists for email: {0}")]
    EmailTaken(String),

    #[error("Setup token issuance failed: {0}")]
    Issuance(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
