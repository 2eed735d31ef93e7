//! Property listing model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_COUNTRY: &str = "USA";
pub const DEFAULT_PROPERTY_TYPE: &str = "house";

/// Largest accepted price; stores compare prices as signed 64-bit integers
pub const MAX_PRICE: u64 = i64::MAX as u64;

/// Listing status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    #[default]
    Sale,
    Rent,
}

impl PropertyStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Sale => "sale",
            PropertyStatus::Rent => "rent",
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(PropertyStatus::Sale),
            "rent" => Ok(PropertyStatus::Rent),
            _ => Err(format!("Invalid status '{}'. Valid options: sale, rent", s)),
        }
    }
}

/// Validator function for prices
pub fn validate_price(price: u64) -> Result<(), ValidationError> {
    if price > MAX_PRICE {
        return Err(ValidationError::new("price_range")
            .with_message(format!("price must not exceed {}", MAX_PRICE).into()));
    }
    Ok(())
}

/// Validator function for bathroom counts and bounds
pub fn validate_bathrooms(bathrooms: f64) -> Result<(), ValidationError> {
    if !bathrooms.is_finite() {
        return Err(ValidationError::new("bathrooms_finite")
            .with_message("bathrooms must be a finite number".into()));
    }
    if bathrooms < 0.0 {
        return Err(ValidationError::new("bathrooms_range")
            .with_message("bathrooms must not be negative".into()));
    }
    Ok(())
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

fn default_property_type() -> String {
    DEFAULT_PROPERTY_TYPE.to_string()
}

/// Listing as submitted for creation (identifier is assigned by the store)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewProperty {
    pub title: String,
    pub status: PropertyStatus,
    /// Whole currency units
    #[validate(custom(function = "validate_price"))]
    pub price: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub address: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    #[validate(custom(function = "validate_bathrooms"))]
    pub bathrooms: f64,
    #[serde(default = "default_property_type")]
    pub property_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_sqft: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_size_sqft: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_spaces: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hoa_fee: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Image URLs, in display order
    #[serde(default)]
    pub images: Vec<String>,
    /// Free-form feature tags
    #[serde(default)]
    pub features: Vec<String>,
}

/// Listing as returned by search
///
/// Fields that legacy records may lack are `Option` and serialize as `null`;
/// defaulted fields are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Property {
    pub id: String,
    pub title: Option<String>,
    pub status: Option<PropertyStatus>,
    pub price: Option<u64>,
    pub currency: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: String,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub property_type: String,
    pub area_sqft: Option<i64>,
    pub lot_size_sqft: Option<i64>,
    pub year_built: Option<i64>,
    pub parking_spaces: Option<i64>,
    pub hoa_fee: Option<i64>,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub features: Vec<String>,
}
