//! Redis-backed expiring counter store for SimLedger
//!
//! Provides the `CounterStore` implementation behind the login attempt
//! limiter, using Redis with connection pooling. The limiter only needs
//! get / set-with-ttl / delete; counters expire on their own and an
//! expired key reads back as absent.
//!
//! # Example
//!
//! ```no_run
//! use simledger_cache::RedisCounterStore;
//! use simledger_core::traits::CounterStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = RedisCounterStore::new("redis://127.0.0.1:6379").await?;
//!
//!     store.set_with_ttl("login_attempts:10.0.0.1", 1, 100).await?;
//!     let count = store.get("login_attempts:10.0.0.1").await?;
//!     assert_eq!(count, Some(1));
//!
//!     Ok(())
//! }
//! ```

pub mod keys;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use simledger_core::error::AppError;
use simledger_core::traits::CounterStore;
use tracing::{debug, error, warn};

/// Redis counter store with connection pooling
///
/// Wraps a Redis ConnectionManager to provide efficient, multiplexed access
/// to Redis. All operations are async and return Results with AppError.
#[derive(Clone)]
pub struct RedisCounterStore {
    manager: ConnectionManager,
}

impl RedisCounterStore {
    /// Create a new Redis counter store
    ///
    /// # Errors
    ///
    /// Returns `AppError::CacheConnection` if the connection fails
    pub async fn new(url: &str) -> Result<Self, AppError> {
        debug!("Connecting to Redis at {}", url);

        let client = Client::open(url).map_err(|e| {
            error!("Failed to create Redis client: {}", e);
            AppError::CacheConnection(format!("Invalid Redis URL: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            error!("Failed to establish Redis connection: {}", e);
            AppError::CacheConnection(format!("Connection failed: {}", e))
        })?;

        debug!("Redis connection established successfully");
        Ok(Self { manager })
    }

    /// Ping the Redis server to check connectivity
    pub async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                error!("Redis ping failed: {}", e);
                AppError::Cache(format!("Ping failed: {}", e))
            })?;
        Ok(())
    }

    /// Flush all keys from the current database
    ///
    /// Destructive; used only by tests against a throwaway instance.
    #[cfg(test)]
    pub async fn flush_db(&self) -> Result<(), AppError> {
        let mut conn = self.manager.clone();
        let _: () = redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                error!("Failed to flush database: {}", e);
                AppError::Cache(format!("Flush failed: {}", e))
            })?;
        Ok(())
    }

    /// Convert RedisError to AppError
    fn map_redis_error(err: RedisError) -> AppError {
        match err.kind() {
            redis::ErrorKind::IoError => {
                error!("Redis I/O error: {}", err);
                AppError::CacheConnection(format!("I/O error: {}", err))
            }
            redis::ErrorKind::TypeError => {
                warn!("Redis type error: {}", err);
                AppError::Cache(format!("Type mismatch: {}", err))
            }
            _ => {
                error!("Redis error: {}", err);
                AppError::Cache(err.to_string())
            }
        }
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    /// Read a counter, `None` when missing or expired
    async fn get(&self, key: &str) -> Result<Option<u32>, AppError> {
        debug!("GET {}", key);
        let mut conn = self.manager.clone();

        let value: Option<u32> = conn.get(key).await.map_err(Self::map_redis_error)?;

        Ok(value)
    }

    /// Write a counter and (re)arm its TTL
    async fn set_with_ttl(&self, key: &str, value: u32, ttl_secs: u64) -> Result<(), AppError> {
        debug!("SET {} = {} (TTL: {}s)", key, value, ttl_secs);
        let mut conn = self.manager.clone();

        let _: () = conn
            .set_ex(key, value, ttl_secs)
            .await
            .map_err(Self::map_redis_error)?;

        Ok(())
    }

    /// Remove a counter; returns whether it existed
    async fn delete(&self, key: &str) -> Result<bool, AppError> {
        debug!("DEL {}", key);
        let mut conn = self.manager.clone();

        let deleted: i32 = conn.del(key).await.map_err(Self::map_redis_error)?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_store() -> RedisCounterStore {
        let store = RedisCounterStore::new("redis://127.0.0.1:6379")
            .await
            .expect("Failed to connect to Redis");
        store.flush_db().await.expect("Failed to flush DB");
        store
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_ping() {
        let store = setup_store().await;
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_set_and_get() {
        let store = setup_store().await;

        store.set_with_ttl("attempts", 3, 60).await.unwrap();
        assert_eq!(store.get("attempts").await.unwrap(), Some(3));
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_get_missing() {
        let store = setup_store().await;
        assert_eq!(store.get("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_delete() {
        let store = setup_store().await;

        store.set_with_ttl("attempts", 1, 60).await.unwrap();
        assert!(store.delete("attempts").await.unwrap());
        assert_eq!(store.get("attempts").await.unwrap(), None);

        // Deleting again reports absence
        assert!(!store.delete("attempts").await.unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn test_ttl_expiry() {
        let store = setup_store().await;

        store.set_with_ttl("attempts", 5, 1).await.unwrap();
        assert_eq!(store.get("attempts").await.unwrap(), Some(5));

        tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;

        assert_eq!(store.get("attempts").await.unwrap(), None);
    }
}
