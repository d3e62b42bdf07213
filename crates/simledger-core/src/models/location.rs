//! Location reference models
//!
//! Region → province → municipality → barangay hierarchy backing the
//! cascading address dropdowns, plus the address entity itself.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Top of the location hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Province {
    pub id: i32,
    pub region_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Municipality {
    pub id: i32,
    pub province_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barangay {
    pub id: i32,
    pub municipality_id: i32,
    pub name: String,
}

/// Postal address assembled from the location hierarchy
///
/// Every selected level must belong to the level above it; `validate_links`
/// enforces this against the fetched parent rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: i32,
    pub region_id: Option<i32>,
    pub province_id: Option<i32>,
    pub municipality_id: Option<i32>,
    pub barangay_id: Option<i32>,
    pub house_number_street: String,
}

impl Address {
    /// Check hierarchy consistency of the selected levels
    ///
    /// Callers pass the rows they resolved for the address' foreign keys;
    /// `None` levels are skipped.
    pub fn validate_links(
        province: Option<&Province>,
        municipality: Option<&Municipality>,
        barangay: Option<&Barangay>,
        region_id: Option<i32>,
    ) -> Result<(), AppError> {
        if let Some(province) = province {
            if region_id != Some(province.region_id) {
                return Err(AppError::Validation(
                    "Selected province does not belong to selected region".to_string(),
                ));
            }
            if let Some(municipality) = municipality {
                if municipality.province_id != province.id {
                    return Err(AppError::Validation(
                        "Selected municipality does not belong to selected province".to_string(),
                    ));
                }
                if let Some(barangay) = barangay {
                    if barangay.municipality_id != municipality.id {
                        return Err(AppError::Validation(
                            "Selected barangay does not belong to selected municipality"
                                .to_string(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}
