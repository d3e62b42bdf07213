//! Location and address DTOs

use serde::Deserialize;
use validator::Validate;

/// Address creation request
///
/// Levels are optional top-down: a barangay without a municipality is
/// rejected by the hierarchy validation, not here.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAddressRequest {
    pub region_id: Option<i32>,
    pub province_id: Option<i32>,
    pub municipality_id: Option<i32>,
    pub barangay_id: Option<i32>,

    /// Free-text house number and street
    #[validate(length(min = 1, max = 300, message = "Street address is required"))]
    pub house_number_street: String,
}
