//! Common traits for repositories and stores
//!
//! Defines abstractions for database access and the expiring counter store
//! backing the login attempt limiter.

use crate::error::AppError;
use crate::models::{
    Address, Barangay, Client, CollectionDay, Handler, Invoice, Municipality, Number, Operator,
    Payment, PrefixEntry, Province, Region, User,
};
use async_trait::async_trait;
use uuid::Uuid;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, AppError>;

    /// Find all entities with pagination
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<T>, AppError>;

    /// Count total entities
    async fn count(&self) -> Result<i64, AppError>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<T, AppError>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<T, AppError>;

    /// Delete entity by ID
    async fn delete(&self, id: ID) -> Result<bool, AppError>;
}

/// Client repository trait with specialized methods
#[async_trait]
pub trait ClientRepository: Repository<Client, Uuid> {
    /// List a user's clients ordered by name
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Client>, AppError>;

    /// Search a user's clients by name (case-insensitive contains)
    async fn search_by_name(&self, user_id: i32, query: &str) -> Result<Vec<Client>, AppError>;

    /// Create a handler attached to a client
    async fn create_handler(&self, handler: &Handler) -> Result<Handler, AppError>;

    /// Update an existing handler
    async fn update_handler(&self, handler: &Handler) -> Result<Handler, AppError>;

    /// List handlers for a client
    async fn handlers_for_client(&self, client_id: Uuid) -> Result<Vec<Handler>, AppError>;
}

/// Number repository trait with specialized methods
#[async_trait]
pub trait NumberRepository: Repository<Number, Uuid> {
    /// Find a number by its stored value
    async fn find_by_value(&self, value: &str) -> Result<Option<Number>, AppError>;

    /// List a client's numbers, optionally filtered by value fragment and operator
    async fn list_for_client(
        &self,
        client_id: Uuid,
        value_fragment: Option<&str>,
        operator_id: Option<i32>,
    ) -> Result<Vec<Number>, AppError>;

    /// Search numbers across all clients of a user by value fragment
    async fn search_for_user(
        &self,
        user_id: i32,
        value_fragment: &str,
    ) -> Result<Vec<Number>, AppError>;

    /// List all numbers of a user (no fragment filter)
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Number>, AppError>;

    /// List active numbers due on a collection day
    async fn list_by_collection_day(
        &self,
        user_id: i32,
        day: CollectionDay,
    ) -> Result<Vec<Number>, AppError>;
}

/// Ledger store trait - append and fetch only
///
/// Invoice and payment rows are append-only from the engine's perspective;
/// rows disappear only through number cascade deletion.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Fetch a number's invoices in storage order
    async fn invoices_for(&self, number_id: Uuid) -> Result<Vec<Invoice>, AppError>;

    /// Fetch a number's payments in storage order
    async fn payments_for(&self, number_id: Uuid) -> Result<Vec<Payment>, AppError>;

    /// Append an invoice row (input `id` is ignored)
    async fn add_invoice(&self, invoice: &Invoice) -> Result<Invoice, AppError>;

    /// Append a payment row (input `id` is ignored)
    async fn add_payment(&self, payment: &Payment) -> Result<Payment, AppError>;
}

/// Prefix table trait
///
/// Zero-or-one exact match per candidate key; width precedence lives in the
/// resolver, not here.
#[async_trait]
pub trait PrefixRepository: Send + Sync {
    /// Exact-match lookup of a prefix candidate
    async fn find_by_prefix(&self, prefix: &str) -> Result<Option<PrefixEntry>, AppError>;

    /// Find an operator by id
    async fn find_operator(&self, id: i32) -> Result<Option<Operator>, AppError>;

    /// List all operators
    async fn list_operators(&self) -> Result<Vec<Operator>, AppError>;

    /// Idempotently seed operators with their prefixes
    async fn seed_operators(&self, seed: &[(&str, &[&str])]) -> Result<(), AppError>;
}

/// Location reference data trait (cascading dropdowns)
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// All regions, newest first
    async fn regions(&self) -> Result<Vec<Region>, AppError>;

    /// Provinces of a region, newest first
    async fn provinces_by_region(&self, region_id: i32) -> Result<Vec<Province>, AppError>;

    /// Municipalities of a province, newest first
    async fn municipalities_by_province(
        &self,
        province_id: i32,
    ) -> Result<Vec<Municipality>, AppError>;

    /// Barangays of a municipality, by name
    async fn barangays_by_municipality(
        &self,
        municipality_id: i32,
    ) -> Result<Vec<Barangay>, AppError>;

    /// Find a province by id
    async fn find_province(&self, id: i32) -> Result<Option<Province>, AppError>;

    /// Find a municipality by id
    async fn find_municipality(&self, id: i32) -> Result<Option<Municipality>, AppError>;

    /// Find a barangay by id
    async fn find_barangay(&self, id: i32) -> Result<Option<Barangay>, AppError>;

    /// Persist an address (input `id` is ignored)
    async fn create_address(&self, address: &Address) -> Result<Address, AppError>;
}

/// User repository trait with specialized methods
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Find user by id
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    /// Create a user (input `id` is ignored)
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Update last login timestamp
    async fn update_last_login(&self, id: i32) -> Result<(), AppError>;
}

/// Expiring counter store backing the login attempt limiter
///
/// Keys carry an integer counter and a TTL; an expired key reads back as
/// absent. The store is assumed volatile - a restart clears all counters.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Read a counter, `None` when missing or expired
    async fn get(&self, key: &str) -> Result<Option<u32>, AppError>;

    /// Write a counter and (re)arm its TTL
    async fn set_with_ttl(&self, key: &str, value: u32, ttl_secs: u64) -> Result<(), AppError>;

    /// Remove a counter; returns whether it existed
    async fn delete(&self, key: &str) -> Result<bool, AppError>;
}
