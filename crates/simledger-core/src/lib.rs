//! SimLedger Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the SimLedger back-office system. It includes:
//!
//! - Domain models (Client, Number, Invoice, Payment, Operator, etc.)
//! - Common traits for repositories and the expiring counter store
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
