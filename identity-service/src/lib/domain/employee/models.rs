use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::employee::errors::EmailError;
use crate::domain::employee::errors::EmployeeIdError;
use crate::domain::employee::errors::EmployeeStatusError;

/// Employee business record.
///
/// Identity-independent: this is what the HR workflow creates and what the
/// account provisioner reads to derive a login identity.
#[derive(Debug, Clone)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    /// Name as it appears in notifications ("first last", trimmed).
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Employee unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmployeeId(pub Uuid);

impl EmployeeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an employee ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, EmployeeIdError> {
        Uuid::parse_str(s)
            .map(EmployeeId)
            .map_err(|e| EmployeeIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for EmployeeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Employment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeStatus {
    Active,
    Exited,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "ACTIVE",
            EmployeeStatus::Exited => "EXITED",
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeStatus {
    type Err = EmployeeStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(EmployeeStatus::Active),
            "EXITED" => Ok(EmployeeStatus::Exited),
            other => Err(EmployeeStatusError::Unknown(other.to_string())),
        }
    }
}

/// Email address type
///
/// Validates with an RFC 5322 compliant parser, then normalizes to trimmed
/// lowercase so the identity uniqueness constraint compares like with like.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated, normalized email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&normalized)
            .map(|_| EmailAddress(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to create a new employee with validated fields.
#[derive(Debug)]
pub struct CreateEmployeeCommand {
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_normalized() {
        let email = EmailAddress::new("  Ana.Petrova@X.COM ".to_string()).unwrap();
        assert_eq!(email.as_str(), "ana.petrova@x.com");
    }

    #[test]
    fn test_invalid_email_rejected() {
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_display_name_trims() {
        let employee = Employee {
            id: EmployeeId::new(),
            first_name: "Ana".to_string(),
            last_name: "".to_string(),
            email: EmailAddress::new("ana@x.com".to_string()).unwrap(),
            status: EmployeeStatus::Active,
            created_at: Utc::now(),
        };
        assert_eq!(employee.display_name(), "Ana");
    }
}
