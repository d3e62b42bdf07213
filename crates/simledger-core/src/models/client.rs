//! Client and handler models
//!
//! A client is a reseller customer owning a set of numbers; handlers are the
//! collection agents attached to a client.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Client status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
    Disabled,
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientStatus::Active => write!(f, "Active"),
            ClientStatus::Inactive => write!(f, "Inactive"),
            ClientStatus::Disabled => write!(f, "Disabled"),
        }
    }
}

impl ClientStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(ClientStatus::Active),
            "inactive" => Some(ClientStatus::Inactive),
            "disabled" => Some(ClientStatus::Disabled),
            _ => None,
        }
    }
}

/// Client entity
///
/// Scoped to the back-office user that registered it; listings and searches
/// never cross user boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier
    pub id: Uuid,

    /// Registered name
    pub name: String,

    /// Trade name the business operates under
    pub trade_name: String,

    /// Contact number digits
    pub contact_number: String,

    /// Client status
    pub status: ClientStatus,

    /// Primary address, if captured
    pub primary_address_id: Option<i32>,

    /// Date the client applied
    pub application_date: NaiveDate,

    /// Owning back-office user
    pub user_id: i32,
}

/// Handler entity - a collection agent attached to one client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Handler {
    /// Unique identifier
    pub id: i32,

    /// Handler name
    pub name: String,

    /// Contact number digits
    pub contact: String,

    /// Client this handler works for
    pub client_id: Uuid,
}
