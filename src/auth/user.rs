//! Account models and their outward projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::models::{Credential, Role};
use crate::domain::UserId;

/// Stored representation of an account, without its credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Normalize email to lowercase for consistent storage and comparison.
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

/// New account database payload.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub credential: Credential,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Update payload for an existing account.
///
/// `credential` is `None` when the password is left unchanged.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub name: String,
    pub credential: Option<Credential>,
}

/// Public projection of an account. Never carries the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Successful login payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: UserId::new(1),
            name: "Ana".into(),
            email: "a@x.com".into(),
            role: Role::Developer,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn email_normalization() {
        assert_eq!(User::normalize_email("Test@Example.COM"), "test@example.com");
        assert_eq!(User::normalize_email("  user@HOST.com  "), "user@host.com");
    }

    #[test]
    fn user_response_conversion() {
        let user = user();
        let response: UserResponse = user.clone().into();

        assert_eq!(response.id, user.id);
        assert_eq!(response.email, user.email);
        assert_eq!(response.role, Role::Developer);
    }

    #[test]
    fn login_response_shape() {
        let response = LoginResponse { user: user().into(), token: "t".into(), expires_in: 900 };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["expiresIn"], 900);
        assert_eq!(json["user"]["role"], "DEVELOPER");
        assert!(json["user"].get("hash").is_none());
        assert!(json["user"].get("salt").is_none());
    }
}
