use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// The closed set of roles known to the platform.
///
/// Roles are a fixed enum rather than persisted rows: the policy layer
/// reasons about them exhaustively and nothing configures roles at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Base self-service role granted to every provisioned employee identity.
    #[serde(rename = "EMPLOYEE")]
    Employee,

    /// HR staff; may create employee records.
    #[serde(rename = "HR_MANAGER")]
    HrManager,

    /// Full administrative access.
    #[serde(rename = "ADMIN")]
    Admin,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "EMPLOYEE",
            Role::HrManager => "HR_MANAGER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMPLOYEE" => Ok(Role::Employee),
            "HR_MANAGER" => Ok(Role::HrManager),
            "ADMIN" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_roles() {
        for role in [Role::Employee, Role::HrManager, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("INTERN".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Role::HrManager).unwrap();
        assert_eq!(json, "\"HR_MANAGER\"");
    }
}
