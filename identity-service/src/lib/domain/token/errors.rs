use thiserror::Error;

/// Top-level error for setup-token operations
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    /// Not-found, already-used and expired deliberately collapse into one
    /// undifferentiated outcome so callers cannot enumerate tokens.
    #[error("Invalid or expired token.")]
    TokenInvalid,

    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Error for notification delivery operations.
///
/// These are logged and swallowed at the issuance boundary; no caller of
/// `issue` ever observes delivery outcome.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    #[error("Notification delivery failed: {0}")]
    SendFailed(String),

    #[error("Notifier is not configured: {0}")]
    NotConfigured(String),
}
