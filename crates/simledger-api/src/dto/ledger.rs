//! Ledger DTOs
//!
//! Append-only invoice and payment rows; no update or delete requests exist.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

/// Invoice creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    /// Load amount credited to the SIM
    pub added_load: Decimal,

    /// Amount owed by this invoice
    pub balance: Decimal,

    /// Telco transaction reference
    #[validate(length(min = 1, max = 100, message = "Reference number is required"))]
    pub reference_number: String,

    /// Event time; defaults to now
    pub time: Option<DateTime<Utc>>,
}

/// Payment creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentRequest {
    /// Amount paid
    pub paid_amount: Decimal,

    /// Event time; defaults to now
    pub time: Option<DateTime<Utc>>,
}
