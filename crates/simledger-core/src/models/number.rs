//! Number model
//!
//! Represents a SIM/phone number owned by a client. The operator is assigned
//! once at creation by prefix matching and is not recomputed on edit.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// SIM status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SimStatus {
    /// SIM is in service
    #[default]
    Active,
    /// SIM temporarily out of rotation
    Inactive,
    /// SIM permanently disabled
    Disabled,
}

impl fmt::Display for SimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimStatus::Active => write!(f, "Active"),
            SimStatus::Inactive => write!(f, "Inactive"),
            SimStatus::Disabled => write!(f, "Disabled"),
        }
    }
}

impl SimStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(SimStatus::Active),
            "inactive" => Some(SimStatus::Inactive),
            "disabled" => Some(SimStatus::Disabled),
            _ => None,
        }
    }
}

/// Weekday on which a number's balance is collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl fmt::Display for CollectionDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CollectionDay::Monday => "Monday",
            CollectionDay::Tuesday => "Tuesday",
            CollectionDay::Wednesday => "Wednesday",
            CollectionDay::Thursday => "Thursday",
            CollectionDay::Friday => "Friday",
            CollectionDay::Saturday => "Saturday",
            CollectionDay::Sunday => "Sunday",
        };
        write!(f, "{}", name)
    }
}

impl CollectionDay {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "monday" => Some(CollectionDay::Monday),
            "tuesday" => Some(CollectionDay::Tuesday),
            "wednesday" => Some(CollectionDay::Wednesday),
            "thursday" => Some(CollectionDay::Thursday),
            "friday" => Some(CollectionDay::Friday),
            "saturday" => Some(CollectionDay::Saturday),
            "sunday" => Some(CollectionDay::Sunday),
            _ => None,
        }
    }

    /// Map from a chrono weekday (for "collections due today" listings)
    pub fn from_weekday(day: Weekday) -> Self {
        match day {
            Weekday::Mon => CollectionDay::Monday,
            Weekday::Tue => CollectionDay::Tuesday,
            Weekday::Wed => CollectionDay::Wednesday,
            Weekday::Thu => CollectionDay::Thursday,
            Weekday::Fri => CollectionDay::Friday,
            Weekday::Sat => CollectionDay::Saturday,
            Weekday::Sun => CollectionDay::Sunday,
        }
    }
}

/// Number entity
///
/// `value` is the stored numeric string and is globally unique. Deleting a
/// number cascade-deletes its invoice/payment rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Number {
    /// Unique identifier
    pub id: Uuid,

    /// The phone number digits as stored (globally unique)
    pub value: String,

    /// SIM status
    pub sim_status: SimStatus,

    /// Operator assigned at intake via prefix matching
    pub operator_id: i32,

    /// Owning client
    pub client_id: Uuid,

    /// Handler responsible for this number
    pub handler_id: i32,

    /// Weekday the balance is collected
    pub collection_day: CollectionDay,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_status_roundtrip() {
        assert_eq!(SimStatus::from_str("Active"), Some(SimStatus::Active));
        assert_eq!(SimStatus::from_str("DISABLED"), Some(SimStatus::Disabled));
        assert_eq!(SimStatus::from_str("unknown"), None);
        assert_eq!(SimStatus::Inactive.to_string(), "Inactive");
    }

    #[test]
    fn test_collection_day_parsing() {
        assert_eq!(
            CollectionDay::from_str("wednesday"),
            Some(CollectionDay::Wednesday)
        );
        assert_eq!(CollectionDay::from_str("holiday"), None);
    }

    #[test]
    fn test_collection_day_from_weekday() {
        assert_eq!(
            CollectionDay::from_weekday(Weekday::Sat),
            CollectionDay::Saturday
        );
        assert_eq!(CollectionDay::from_weekday(Weekday::Mon).to_string(), "Monday");
    }
}
