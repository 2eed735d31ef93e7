//! Search criteria for one listing search

use super::property::PropertyStatus;

/// Optional filters for a listing search
///
/// Every field except `status` is independent and optional; an absent field
/// contributes no constraint. Numeric bounds are non-negative by type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub status: PropertyStatus,
    /// Free text matched against title, city, state and address
    pub q: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    /// Minimum bedrooms
    pub bedrooms: Option<u32>,
    /// Minimum bathrooms
    pub bathrooms: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub property_type: Option<String>,
}

impl SearchCriteria {
    pub fn with_status(status: PropertyStatus) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }
}
