//! Counter store key constants and builders
//!
//! Standardized key naming for everything kept in Redis, preventing
//! collisions between concerns.
//!
//! # Key Patterns
//!
//! - `login_attempts:{address}` - failed-login counter per client address
//!
//! # Example
//!
//! ```
//! use simledger_cache::keys;
//!
//! let key = keys::login_attempts_key("203.0.113.7");
//! assert_eq!(key, "login_attempts:203.0.113.7");
//! ```

/// Prefix for failed-login counters
///
/// Format: `login_attempts:{address}`
pub const LOGIN_ATTEMPTS_PREFIX: &str = "login_attempts";

/// Sliding lockout window in seconds; every failure re-arms it
pub const LOGIN_ATTEMPTS_TTL_SECS: u64 = 100;

/// Failed attempts allowed before the address is locked out
pub const LOGIN_ATTEMPTS_THRESHOLD: u32 = 5;

/// Build the counter key for a client address
pub fn login_attempts_key(address: &str) -> String {
    format!("{}:{}", LOGIN_ATTEMPTS_PREFIX, address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_attempts_key() {
        assert_eq!(login_attempts_key("10.0.0.1"), "login_attempts:10.0.0.1");
        assert_eq!(login_attempts_key("::1"), "login_attempts:::1");
    }

    #[test]
    fn test_policy_constants() {
        assert_eq!(LOGIN_ATTEMPTS_TTL_SECS, 100);
        assert_eq!(LOGIN_ATTEMPTS_THRESHOLD, 5);
    }
}
