//! HTTP handlers
//!
//! Handlers construct their repositories from the shared pool per request
//! and delegate business rules to simledger-services. Ownership checks live
//! in the helpers here: every client- or number-scoped operation first
//! proves the entity belongs to the calling user, and a foreign entity is
//! indistinguishable from a missing one.

pub mod auth;
pub mod clients;
pub mod collections;
pub mod locations;
pub mod numbers;
pub mod operators;

pub use auth::configure as configure_auth;
pub use clients::configure as configure_clients;
pub use collections::configure as configure_collections;
pub use locations::configure as configure_locations;
pub use numbers::configure as configure_numbers;
pub use operators::configure as configure_operators;

use simledger_core::models::{Client, Number, User};
use simledger_core::traits::{ClientRepository, NumberRepository, Repository, UserRepository};
use simledger_core::{AppError, AppResult};
use simledger_db::{PgClientRepository, PgNumberRepository, PgUserRepository};
use sqlx::PgPool;
use uuid::Uuid;

/// Resolve the calling user's database row from their token subject
pub(crate) async fn current_user(pool: &PgPool, username: &str) -> AppResult<User> {
    PgUserRepository::new(pool.clone())
        .find_by_username(username)
        .await?
        .ok_or(AppError::UserNotFound)
}

/// Fetch a client and prove it belongs to the user
pub(crate) async fn owned_client(
    pool: &PgPool,
    client_id: Uuid,
    user_id: i32,
) -> AppResult<Client> {
    let client = PgClientRepository::new(pool.clone())
        .find_by_id(client_id)
        .await?
        .ok_or(AppError::ClientNotFound)?;

    if client.user_id != user_id {
        return Err(AppError::ClientNotFound);
    }

    Ok(client)
}

/// Fetch a number and prove its client belongs to the user
pub(crate) async fn owned_number(
    pool: &PgPool,
    number_id: Uuid,
    user_id: i32,
) -> AppResult<Number> {
    let number = PgNumberRepository::new(pool.clone())
        .find_by_id(number_id)
        .await?
        .ok_or(AppError::NumberNotFound)?;

    // Ownership goes through the client; a foreign number reads as missing
    let client = PgClientRepository::new(pool.clone())
        .find_by_id(number.client_id)
        .await?
        .ok_or(AppError::NumberNotFound)?;

    if client.user_id != user_id {
        return Err(AppError::NumberNotFound);
    }

    Ok(number)
}
