//! Client and handler DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use simledger_core::models::Client;
use validator::Validate;

/// Client creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClientRequest {
    /// Registered name
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    /// Trade name the business operates under
    #[validate(length(min = 1, max = 200, message = "Trade name is required"))]
    pub trade_name: String,

    /// Contact number digits
    #[validate(length(min = 1, max = 20, message = "Contact number is required"))]
    pub contact_number: String,

    /// Date the client applied; defaults to today
    pub application_date: Option<NaiveDate>,

    /// Status (active, inactive, disabled); defaults to active
    pub status: Option<String>,
}

/// Client update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 200, message = "Trade name is required"))]
    pub trade_name: String,

    #[validate(length(min = 1, max = 20, message = "Contact number is required"))]
    pub contact_number: String,

    pub status: Option<String>,

    /// Primary address; set after creating one via the locations endpoint
    pub primary_address_id: Option<i32>,
}

/// Client with inventory totals
#[derive(Debug, Clone, Serialize)]
pub struct ClientDetailResponse {
    /// The client entity
    pub client: Client,

    /// How many numbers the client holds
    pub numbers_count: usize,

    /// Sum of those numbers' current balances
    pub total_balance: Decimal,
}

/// Client list query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct ClientListQuery {
    /// Optional name search (case-insensitive contains)
    pub q: Option<String>,
}

/// Handler creation/update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HandlerRequest {
    /// Handler name
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    /// Contact number digits
    #[validate(length(min = 1, max = 20, message = "Contact is required"))]
    pub contact: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_validation() {
        let valid = CreateClientRequest {
            name: "Acme Trading".to_string(),
            trade_name: "Acme".to_string(),
            contact_number: "09171234567".to_string(),
            application_date: None,
            status: None,
        };
        assert!(valid.validate().is_ok());

        let invalid = CreateClientRequest {
            name: "".to_string(),
            trade_name: "Acme".to_string(),
            contact_number: "".to_string(),
            application_date: None,
            status: None,
        };
        assert!(invalid.validate().is_err());
    }
}
