//! Number DTOs
//!
//! Requests for number intake and edit, plus the history and statement
//! query shapes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use simledger_core::models::{HistoryEntry, Number};
use uuid::Uuid;
use validator::Validate;

/// Number creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNumberRequest {
    /// Phone number digits as entered
    #[validate(length(min = 1, max = 20, message = "Number value is required"))]
    pub value: String,

    /// Owning client
    pub client_id: Uuid,

    /// Handler responsible for the number
    pub handler_id: i32,

    /// SIM status (active, inactive, disabled); defaults to active
    pub sim_status: Option<String>,

    /// Collection weekday
    #[validate(length(min = 1, message = "Collection day is required"))]
    pub collection_day: String,
}

/// Number update request
///
/// Value and operator are not editable.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateNumberRequest {
    /// SIM status
    #[validate(length(min = 1, message = "SIM status is required"))]
    pub sim_status: String,

    /// Handler responsible for the number
    pub handler_id: i32,

    /// Collection weekday
    #[validate(length(min = 1, message = "Collection day is required"))]
    pub collection_day: String,
}

/// Number search query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct NumberSearchQuery {
    /// Value fragment; +63 and 0-prefixed forms are normalized
    pub q: Option<String>,

    /// Narrow to one operator
    pub operator_id: Option<i32>,
}

/// Number with its derived balance
#[derive(Debug, Clone, Serialize)]
pub struct NumberDetailResponse {
    /// The number entity
    pub number: Number,

    /// Current outstanding balance
    pub balance: Decimal,
}

/// History table query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    /// Substring filter over reference and time
    #[serde(default)]
    pub search: String,

    /// Sort token; unknown values fall back to time_desc
    #[serde(default)]
    pub sort: String,

    /// 1-indexed page number, clamped into range
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// One page of history rows
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPageResponse {
    pub items: Vec<HistoryEntry>,
    pub page_number: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
    /// The sort token actually applied
    pub sort: String,
}

/// Statement date range query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct StatementQuery {
    /// Inclusive start date, YYYY-MM-DD
    pub start: String,

    /// Inclusive end date, YYYY-MM-DD
    pub end: String,
}

/// Collections listing query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionsQuery {
    /// Weekday name; defaults to today (UTC)
    pub day: Option<String>,

    /// Include settled numbers too
    #[serde(default)]
    pub all: bool,
}

/// Collections listing response
#[derive(Debug, Clone, Serialize)]
pub struct CollectionsResponse {
    /// The weekday the listing covers
    pub day: String,

    /// Numbers due with their balances
    pub items: Vec<NumberDetailResponse>,
}
