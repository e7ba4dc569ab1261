use std::fmt;

use auth::Role;
use auth::SessionClaim;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::EmployeeId;
use crate::domain::identity::errors::IdentityIdError;

/// Login principal, distinct from the employee record it may originate from.
///
/// Invariant: `active == true` implies `password_hash.is_some()`. Identities
/// are created inactive with no password; only token consumption activates
/// them, and nothing here deletes them.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: IdentityId,
    pub email: EmailAddress,
    pub password_hash: Option<String>,
    pub active: bool,
    pub role: Role,
    pub employee_id: Option<EmployeeId>,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Inactive identity freshly provisioned for an employee.
    pub fn provisioned(email: EmailAddress, employee_id: EmployeeId) -> Self {
        Self {
            id: IdentityId::new(),
            email,
            password_hash: None,
            active: false,
            role: Role::Employee,
            employee_id: Some(employee_id),
            created_at: Utc::now(),
        }
    }
}

/// Identity unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityId(pub Uuid);

impl IdentityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identity ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdentityIdError> {
        Uuid::parse_str(s)
            .map(IdentityId)
            .map_err(|e| IdentityIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for IdentityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outcome of a successful login: the claim plus its encoded form.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub claim: SessionClaim,
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provisioned_identity_starts_inactive() {
        let email = EmailAddress::new("ana@x.com".to_string()).unwrap();
        let identity = Identity::provisioned(email, EmployeeId::new());

        assert!(!identity.active);
        assert!(identity.password_hash.is_none());
        assert_eq!(identity.role, Role::Employee);
        assert!(identity.employee_id.is_some());
    }
}
