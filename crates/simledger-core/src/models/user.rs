//! User model
//!
//! Back-office users that log in and own a set of clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access, can manage users
    Admin,
    /// Regular back-office user
    #[default]
    Staff,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Staff => write!(f, "staff"),
        }
    }
}

impl UserRole {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(UserRole::Admin),
            "staff" => Some(UserRole::Staff),
            _ => None,
        }
    }

    /// Check for admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i32,

    /// Login name (unique)
    pub username: String,

    /// Argon2 password hash
    pub password_hash: String,

    /// User role
    pub role: UserRole,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last successful login
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Public view of a user, without the password hash
    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// User data safe to expose in API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::from_str("Admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_str("staff"), Some(UserRole::Staff));
        assert_eq!(UserRole::from_str("root"), None);
    }

    #[test]
    fn test_info_hides_hash() {
        let user = User {
            id: 1,
            username: "maria".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: UserRole::Staff,
            created_at: Utc::now(),
            last_login: None,
        };

        let info = user.info();
        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("maria"));
    }
}
