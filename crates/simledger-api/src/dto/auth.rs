//! Authentication DTOs
//!
//! Request and response types for authentication endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use simledger_core::models::UserInfo;
use validator::Validate;

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Access token (JWT)
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Token expiration time in seconds
    pub expires_in: i64,

    /// User information
    pub user: UserInfo,
}

impl LoginResponse {
    /// Create a new login response
    pub fn new(access_token: String, expires_in: i64, user: UserInfo) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

/// User registration request (admin only)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username
    #[validate(length(
        min = 3,
        max = 100,
        message = "Username must be between 3 and 100 characters"
    ))]
    pub username: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Role (admin, staff)
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "staff".to_string()
}

/// Current user response
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    /// User information
    pub user: UserInfo,

    /// Token expiration timestamp
    pub token_expires_at: DateTime<Utc>,
}

/// Logout response
#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    /// Success message
    pub message: String,
}

impl Default for LogoutResponse {
    fn default() -> Self {
        Self {
            message: "Logged out successfully".to_string(),
        }
    }
}
