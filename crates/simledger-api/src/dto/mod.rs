//! Data transfer objects
//!
//! Request and response types for the HTTP API, with validation.

pub mod auth;
pub mod client;
pub mod common;
pub mod ledger;
pub mod location;
pub mod number;

pub use common::ApiResponse;
