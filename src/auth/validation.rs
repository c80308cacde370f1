//! Request DTOs for the auth and account endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Email/password credentials.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "email is malformed"), length(max = 60))]
    pub email: String,
    #[validate(length(min = 1, max = 30, message = "password must have 1 to 30 characters"))]
    pub password: String,
}

/// Self-registration and manager-driven account creation share this shape.
///
/// There is no role field: new accounts are always developers.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 60, message = "name must have 1 to 60 characters"))]
    pub name: String,
    #[validate(
        email(message = "email is malformed"),
        length(max = 60, message = "email must have at most 60 characters")
    )]
    pub email: String,
    #[validate(length(min = 1, max = 30, message = "password must have 1 to 30 characters"))]
    pub password: String,
}

pub type RegisterUserRequest = CreateUserRequest;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 60, message = "name must have 1 to 60 characters"))]
    pub name: String,
    /// Absent or empty keeps the current password.
    #[serde(default)]
    #[validate(length(max = 30, message = "password must have at most 30 characters"))]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    /// The replacement password, if one was actually supplied.
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|password| !password.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_validation() {
        let mut request = CreateUserRequest {
            name: "Ana".into(),
            email: "a@x.com".into(),
            password: "secret".into(),
        };
        assert!(request.validate().is_ok());

        request.email = "not-an-email".into();
        assert!(request.validate().is_err());

        request.email = "a@x.com".into();
        request.name = "n".repeat(61);
        assert!(request.validate().is_err());

        request.name = "Ana".into();
        request.password = "p".repeat(31);
        assert!(request.validate().is_err());

        request.password = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn create_user_ignores_role_field() {
        let json = r#"{"name":"Ana","email":"a@x.com","password":"secret","role":"MANAGER"}"#;
        let request: CreateUserRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name, "Ana");
    }

    #[test]
    fn update_password_is_optional() {
        let request: UpdateUserRequest = serde_json::from_str(r#"{"name":"Ana"}"#).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.new_password(), None);

        let request: UpdateUserRequest =
            serde_json::from_str(r#"{"name":"Ana","password":""}"#).unwrap();
        assert_eq!(request.new_password(), None);

        let request: UpdateUserRequest =
            serde_json::from_str(r#"{"name":"Ana","password":"new"}"#).unwrap();
        assert_eq!(request.new_password(), Some("new"));
    }
}
