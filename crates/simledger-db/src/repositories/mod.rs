//! Repository implementations
//!
//! This module contains concrete implementations of all repository traits
//! defined in simledger-core, using sqlx for PostgreSQL access.

pub mod client_repo;
pub mod ledger_repo;
pub mod location_repo;
pub mod number_repo;
pub mod prefix_repo;
pub mod user_repo;

pub use client_repo::PgClientRepository;
pub use ledger_repo::PgLedgerRepository;
pub use location_repo::PgLocationRepository;
pub use number_repo::PgNumberRepository;
pub use prefix_repo::PgPrefixRepository;
pub use user_repo::PgUserRepository;
