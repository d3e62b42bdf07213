//! API layer for SimLedger
//!
//! HTTP API handlers for the reseller back office: clients, numbers,
//! ledgers, collections, statements, and authentication.

#![forbid(unsafe_code)]

pub mod dto;
pub mod handlers;

// Re-export DTOs (common types)
pub use dto::ApiResponse;

// Re-export handler configuration functions
pub use handlers::{
    configure_auth, configure_clients, configure_collections, configure_locations,
    configure_numbers, configure_operators,
};
