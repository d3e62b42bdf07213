//! SimLedger Database Layer
//!
//! This crate provides PostgreSQL database access and repository
//! implementations for the SimLedger back office. It includes:
//!
//! - Connection pool management with sqlx
//! - Repository implementations for all domain entities
//! - Exact-match prefix lookups for operator resolution
//! - Idempotent operator/prefix seeding

pub mod pool;
pub mod repositories;

pub use pool::create_pool;
pub use repositories::*;

// Re-export commonly used types
pub use simledger_core::{AppError, AppResult};
pub use sqlx::{PgPool, Postgres, Transaction};
