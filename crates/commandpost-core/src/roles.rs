//! Caller access levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of access levels a caller can hold.
///
/// The wire format is the upper-case string carried in the
/// `x-access-level` header and stored on [`crate::model::User`] rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Commander,
    Supervisor,
}

impl Role {
    /// The wire representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Commander => "COMMANDER",
            Self::Supervisor => "SUPERVISOR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "COMMANDER" => Ok(Self::Commander),
            "SUPERVISOR" => Ok(Self::Supervisor),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

/// Error returned when a caller supplies an access level outside the
/// closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown access level: {0}")]
pub struct RoleParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for role in [Role::Admin, Role::Commander, Role::Supervisor] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = "OBSERVER".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "unknown access level: OBSERVER");
    }
}
