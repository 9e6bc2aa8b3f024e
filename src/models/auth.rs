//! Authentication request and response types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Login {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
}

/// Registration request. The confirmation is sent along, the backend checks it too.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    #[validate(
        length(min = 4, message = "Password must be at least 4 characters"),
        must_match(other = "password", message = "Passwords must match")
    )]
    pub password_confirm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    /// Current password
    #[validate(length(min = 1, message = "Current password is required"))]
    pub password: String,
    #[validate(length(min = 4, message = "New password must be at least 4 characters"))]
    pub password_new: String,
    #[validate(
        length(min = 4, message = "Password must be at least 4 characters"),
        must_match(other = "password_new", message = "Passwords must match")
    )]
    pub password_confirm: String,
}

/// Account summary sometimes returned next to the token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<AuthUser>,
}
