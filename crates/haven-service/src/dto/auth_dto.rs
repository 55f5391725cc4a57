//! Authentication-related DTOs.

use super::UserProfile;
use haven_core::rules::{password_complexity, valid_username};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Login request. Either the username or the email identifies the account.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub username_or_email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(custom(
        function = "valid_username",
        message = "Username must be 3-32 letters, digits, '_' or '-', starting with a letter"
    ))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(custom(
        function = "password_complexity",
        message = "Password needs 8+ characters with upper, lower and a digit"
    ))]
    pub password: String,

    #[validate(length(max = 64))]
    pub first_name: Option<String>,

    #[validate(length(max = 64))]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Tokens plus the profile of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(register("newagent", "agent@example.com", "Passw0rdA").validate().is_ok());
    }

    #[test]
    fn test_register_request_invalid_fields() {
        assert!(register("x", "agent@example.com", "Passw0rdA").validate().is_err());
        assert!(register("newagent", "not-an-email", "Passw0rdA").validate().is_err());
        assert!(register("newagent", "agent@example.com", "password").validate().is_err());
    }

    #[test]
    fn test_login_request_requires_both_fields() {
        let empty = LoginRequest {
            username_or_email: String::new(),
            password: String::new(),
        };
        let errors = empty.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn test_login_request_uses_camel_case() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"usernameOrEmail":"jane","password":"x"}"#).unwrap();
        assert_eq!(request.username_or_email, "jane");
    }
}
