//! Authentication for SimLedger
//!
//! This crate provides JWT-based authentication, password hashing with Argon2,
//! and the per-address login attempt limiter.
//!
//! # Features
//!
//! - JWT token creation and validation
//! - Argon2 password hashing and verification
//! - Sliding-window login attempt limiting over an expiring counter store
//!
//! # Examples
//!
//! ## Creating a JWT token
//!
//! ```no_run
//! use simledger_auth::{Claims, JwtService};
//! use simledger_core::models::UserRole;
//!
//! let jwt_service = JwtService::new("your-secret-key", 3600);
//! let claims = Claims::new("admin", UserRole::Admin);
//! let token = jwt_service.create_token(&claims)?;
//! # Ok::<(), simledger_core::error::AppError>(())
//! ```
//!
//! ## Password hashing
//!
//! ```no_run
//! use simledger_auth::PasswordService;
//!
//! let password_service = PasswordService::new();
//! let hash = password_service.hash_password("secure_password")?;
//! let is_valid = password_service.verify_password("secure_password", &hash)?;
//! assert!(is_valid);
//! # Ok::<(), simledger_core::error::AppError>(())
//! ```

pub mod claims;
pub mod jwt;
pub mod limiter;
pub mod middleware;
pub mod password;

pub use claims::Claims;
pub use jwt::JwtService;
pub use limiter::{LimiterState, LoginAttemptLimiter};
pub use middleware::{AdminUser, AuthenticatedUser};
pub use password::PasswordService;

#[cfg(test)]
mod tests {
    use super::*;
    use simledger_core::models::UserRole;

    #[test]
    fn test_integration_jwt_and_password() {
        let password_service = PasswordService::new();
        let jwt_service = JwtService::new("test-secret-key-12345", 3600);

        let password = "my_secure_password";
        let hash = password_service.hash_password(password).unwrap();
        assert!(password_service.verify_password(password, &hash).unwrap());
        assert!(!password_service
            .verify_password("wrong_password", &hash)
            .unwrap());

        let claims = Claims::new("testuser", UserRole::Admin);
        let token = jwt_service.create_token(&claims).unwrap();
        let decoded_claims = jwt_service.validate_token(&token).unwrap();

        assert_eq!(decoded_claims.sub, "testuser");
        assert_eq!(decoded_claims.role, UserRole::Admin);
    }
}
