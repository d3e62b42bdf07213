//! Login attempt limiter
//!
//! Tracks failed-login counters per client address in an injected expiring
//! counter store. Each failure increments the counter and re-arms a sliding
//! window; reaching the threshold locks the address out until the counter
//! expires. A success clears the counter immediately.
//!
//! The limiter is purely address-keyed: legitimate and illegitimate actors
//! behind one address share a lockout budget. The backing store is volatile,
//! so a store restart silently resets all lockouts.

use simledger_cache::keys;
use simledger_core::error::AppError;
use simledger_core::traits::CounterStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Snapshot of an address' limiter state after recording an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterState {
    /// Failures currently counted against the address
    pub failures: u32,

    /// Whether the address is locked out
    pub locked: bool,
}

/// Sliding-window login attempt limiter over an expiring counter store
pub struct LoginAttemptLimiter<S: CounterStore> {
    store: Arc<S>,
    threshold: u32,
    window_secs: u64,
}

impl<S: CounterStore> LoginAttemptLimiter<S> {
    /// Create a limiter with explicit policy values
    pub fn new(store: Arc<S>, threshold: u32, window_secs: u64) -> Self {
        Self {
            store,
            threshold,
            window_secs,
        }
    }

    /// Create a limiter with the default policy (5 failures, 100 s window)
    pub fn with_defaults(store: Arc<S>) -> Self {
        Self::new(
            store,
            keys::LOGIN_ATTEMPTS_THRESHOLD,
            keys::LOGIN_ATTEMPTS_TTL_SECS,
        )
    }

    /// Whether an address is currently locked out
    pub async fn is_locked(&self, address: &str) -> Result<bool, AppError> {
        let count = self
            .store
            .get(&keys::login_attempts_key(address))
            .await?
            .unwrap_or(0);

        Ok(count >= self.threshold)
    }

    /// Reject a locked-out address before credentials are consulted
    ///
    /// # Errors
    ///
    /// Returns `AppError::LockedOut` when the address has reached the
    /// failure threshold within the current window.
    pub async fn check(&self, address: &str) -> Result<(), AppError> {
        if self.is_locked(address).await? {
            warn!(address = %address, "Login attempt rejected: address locked out");
            return Err(AppError::LockedOut {
                retry_after_secs: self.window_secs,
            });
        }
        Ok(())
    }

    /// Record an authentication outcome for an address
    ///
    /// A success deletes the counter. A failure increments it and re-arms
    /// the sliding window from now.
    pub async fn record_outcome(
        &self,
        address: &str,
        success: bool,
    ) -> Result<LimiterState, AppError> {
        let key = keys::login_attempts_key(address);

        if success {
            self.store.delete(&key).await?;
            debug!(address = %address, "Login succeeded, attempt counter cleared");
            return Ok(LimiterState {
                failures: 0,
                locked: false,
            });
        }

        let failures = self.store.get(&key).await?.unwrap_or(0) + 1;
        self.store
            .set_with_ttl(&key, failures, self.window_secs)
            .await?;

        let locked = failures >= self.threshold;
        if locked {
            warn!(address = %address, failures, "Address locked out");
        } else {
            debug!(address = %address, failures, "Login failure recorded");
        }

        Ok(LimiterState { failures, locked })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    /// In-memory counter store recording TTLs for window assertions
    #[derive(Default)]
    struct MemoryCounterStore {
        counters: Mutex<HashMap<String, (u32, u64)>>,
    }

    impl MemoryCounterStore {
        async fn ttl_of(&self, key: &str) -> Option<u64> {
            self.counters.lock().await.get(key).map(|(_, ttl)| *ttl)
        }

        /// Simulate the window lapsing for one key
        async fn expire(&self, key: &str) {
            self.counters.lock().await.remove(key);
        }
    }

    #[async_trait]
    impl CounterStore for MemoryCounterStore {
        async fn get(&self, key: &str) -> Result<Option<u32>, AppError> {
            Ok(self.counters.lock().await.get(key).map(|(v, _)| *v))
        }

        async fn set_with_ttl(&self, key: &str, value: u32, ttl_secs: u64) -> Result<(), AppError> {
            self.counters
                .lock()
                .await
                .insert(key.to_string(), (value, ttl_secs));
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<bool, AppError> {
            Ok(self.counters.lock().await.remove(key).is_some())
        }
    }

    fn limiter() -> (Arc<MemoryCounterStore>, LoginAttemptLimiter<MemoryCounterStore>) {
        let store = Arc::new(MemoryCounterStore::default());
        let limiter = LoginAttemptLimiter::with_defaults(store.clone());
        (store, limiter)
    }

    #[tokio::test]
    async fn test_five_failures_lock_address() {
        let (_, limiter) = limiter();

        for i in 1..=4 {
            let state = limiter.record_outcome("10.0.0.1", false).await.unwrap();
            assert_eq!(state.failures, i);
            assert!(!state.locked);
        }

        let state = limiter.record_outcome("10.0.0.1", false).await.unwrap();
        assert_eq!(state.failures, 5);
        assert!(state.locked);
        assert!(limiter.is_locked("10.0.0.1").await.unwrap());
    }

    #[tokio::test]
    async fn test_check_rejects_locked_address() {
        let (_, limiter) = limiter();

        for _ in 0..5 {
            limiter.record_outcome("10.0.0.1", false).await.unwrap();
        }

        let result = limiter.check("10.0.0.1").await;
        assert!(matches!(
            result,
            Err(AppError::LockedOut {
                retry_after_secs: 100
            })
        ));
    }

    #[tokio::test]
    async fn test_success_clears_counter() {
        let (_, limiter) = limiter();

        for _ in 0..4 {
            limiter.record_outcome("10.0.0.1", false).await.unwrap();
        }
        assert!(!limiter.is_locked("10.0.0.1").await.unwrap());

        let state = limiter.record_outcome("10.0.0.1", true).await.unwrap();
        assert_eq!(state.failures, 0);
        assert!(!state.locked);
        assert!(!limiter.is_locked("10.0.0.1").await.unwrap());

        // A fresh failure starts from one again
        let state = limiter.record_outcome("10.0.0.1", false).await.unwrap();
        assert_eq!(state.failures, 1);
    }

    #[tokio::test]
    async fn test_each_failure_rearms_window() {
        let (store, limiter) = limiter();
        let key = keys::login_attempts_key("10.0.0.1");

        limiter.record_outcome("10.0.0.1", false).await.unwrap();
        assert_eq!(store.ttl_of(&key).await, Some(100));

        limiter.record_outcome("10.0.0.1", false).await.unwrap();
        // The TTL is written again from now: sliding window, not fixed
        assert_eq!(store.ttl_of(&key).await, Some(100));
    }

    #[tokio::test]
    async fn test_window_lapse_unlocks() {
        let (store, limiter) = limiter();

        for _ in 0..5 {
            limiter.record_outcome("10.0.0.1", false).await.unwrap();
        }
        assert!(limiter.is_locked("10.0.0.1").await.unwrap());

        store.expire(&keys::login_attempts_key("10.0.0.1")).await;

        assert!(!limiter.is_locked("10.0.0.1").await.unwrap());
        assert!(limiter.check("10.0.0.1").await.is_ok());
    }

    #[tokio::test]
    async fn test_addresses_are_independent() {
        let (_, limiter) = limiter();

        for _ in 0..5 {
            limiter.record_outcome("10.0.0.1", false).await.unwrap();
        }

        assert!(limiter.is_locked("10.0.0.1").await.unwrap());
        assert!(!limiter.is_locked("10.0.0.2").await.unwrap());
    }
}
