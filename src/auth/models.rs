//! Data models shared by the authentication stack.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

use crate::domain::UserId;

/// Account role. `Manager` is the only elevated role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Developer,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Developer => "DEVELOPER",
            Role::Manager => "MANAGER",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEVELOPER" => Ok(Role::Developer),
            "MANAGER" => Ok(Role::Manager),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

/// Error returned when role parsing fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

/// Request-scoped identity derived from a validated session token.
///
/// Built fresh for every authenticated request and handed to workflows as an
/// explicit argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: UserId,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn new(
        subject_id: UserId,
        display_name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self { subject_id, display_name: display_name.into(), email: email.into(), role }
    }
}

/// Salted password hash. Never leaves the storage and auth layers.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub hash: String,
    pub salt: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential").field("hash", &"[REDACTED]").field("salt", &"[REDACTED]").finish()
    }
}

/// Errors returned by the authentication middleware.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("unauthorized: bearer token missing")]
    MissingBearer,
    #[error("unauthorized: malformed bearer token")]
    MalformedBearer,
    #[error("unauthorized: invalid token")]
    InvalidToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trip() {
        for (input, expected) in [("DEVELOPER", Role::Developer), ("MANAGER", Role::Manager)] {
            let parsed = input.parse::<Role>().unwrap();
            assert_eq!(parsed, expected);
            assert_eq!(parsed.to_string(), input);
        }

        let err = "ADMIN".parse::<Role>().unwrap_err();
        assert_eq!(err.0, "ADMIN");
    }

    #[test]
    fn role_defaults_to_developer() {
        assert_eq!(Role::default(), Role::Developer);
    }

    #[test]
    fn credential_debug_is_redacted() {
        let credential = Credential { hash: "abc".into(), salt: "def".into() };
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("abc"));
        assert!(!debug.contains("def"));
    }
}
