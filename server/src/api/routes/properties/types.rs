//! Property API types

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::types::{default_limit, validate_bedrooms, validate_limit};
use crate::domain::listings::property::validate_bathrooms;
use crate::domain::listings::{PropertyStatus, SearchCriteria};

/// Query params for searching properties
///
/// Numeric bounds are parsed as signed integers so that a negative value is
/// reported as a validation failure rather than a parse failure. Price bounds
/// above `i64::MAX` fail to parse.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SearchPropertiesQuery {
    /// Free text matched against title, city, state and address
    pub q: Option<String>,
    #[validate(range(min = 0, message = "min_price must not be negative"))]
    pub min_price: Option<i64>,
    #[validate(range(min = 0, message = "max_price must not be negative"))]
    pub max_price: Option<i64>,
    /// Minimum bedrooms
    #[validate(custom(function = "validate_bedrooms"))]
    pub bedrooms: Option<i64>,
    /// Minimum bathrooms
    #[validate(custom(function = "validate_bathrooms"))]
    pub bathrooms: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub property_type: Option<String>,
    #[serde(default)]
    pub status: PropertyStatus,
    #[serde(default = "default_limit")]
    #[validate(custom(function = "validate_limit"))]
    pub limit: u32,
}

impl SearchPropertiesQuery {
    /// Convert validated params into search criteria
    ///
    /// Empty text params count as absent.
    pub fn to_criteria(&self) -> SearchCriteria {
        SearchCriteria {
            status: self.status,
            q: non_empty(&self.q),
            min_price: self.min_price.and_then(|n| u64::try_from(n).ok()),
            max_price: self.max_price.and_then(|n| u64::try_from(n).ok()),
            bedrooms: self.bedrooms.and_then(|n| u32::try_from(n).ok()),
            bathrooms: self.bathrooms,
            city: non_empty(&self.city),
            state: non_empty(&self.state),
            property_type: non_empty(&self.property_type),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}
