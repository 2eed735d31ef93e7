//! Stored record to output normalization
//!
//! Stored records are schemaless and may be partial or carry values of the
//! wrong type. Extraction into [`RawProperty`] is lenient: anything that does
//! not fit a field's type counts as absent. [`normalize`] then applies the
//! listing defaults and never fails.

use serde_json::Value;

use crate::data::document::{Document, ID_FIELD};

use super::property::{
    DEFAULT_COUNTRY, DEFAULT_CURRENCY, DEFAULT_PROPERTY_TYPE, Property, PropertyStatus,
};

/// A stored listing with every field optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawProperty {
    pub id: Option<String>,
    pub title: Option<String>,
    pub status: Option<PropertyStatus>,
    pub price: Option<u64>,
    pub currency: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    pub property_type: Option<String>,
    pub area_sqft: Option<i64>,
    pub lot_size_sqft: Option<i64>,
    pub year_built: Option<i64>,
    pub parking_spaces: Option<i64>,
    pub hoa_fee: Option<i64>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
}

impl RawProperty {
    /// Extract fields from a stored document
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.get(ID_FIELD).and_then(id_string),
            title: text(doc, "title"),
            status: text(doc, "status").and_then(|s| s.parse().ok()),
            price: unsigned(doc, "price"),
            currency: text(doc, "currency"),
            address: text(doc, "address"),
            city: text(doc, "city"),
            state: text(doc, "state"),
            country: text(doc, "country"),
            bedrooms: unsigned(doc, "bedrooms").and_then(|n| u32::try_from(n).ok()),
            bathrooms: doc
                .get("bathrooms")
                .and_then(Value::as_f64)
                .filter(|n| *n >= 0.0),
            property_type: text(doc, "property_type"),
            area_sqft: integer(doc, "area_sqft"),
            lot_size_sqft: integer(doc, "lot_size_sqft"),
            year_built: integer(doc, "year_built"),
            parking_spaces: integer(doc, "parking_spaces"),
            hoa_fee: integer(doc, "hoa_fee"),
            description: text(doc, "description"),
            images: strings(doc, "images"),
            features: strings(doc, "features"),
        }
    }
}

/// Apply listing defaults to a raw record
pub fn normalize(raw: RawProperty) -> Property {
    Property {
        id: raw.id.unwrap_or_default(),
        title: raw.title,
        status: raw.status,
        price: raw.price,
        currency: raw.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        address: raw.address,
        city: raw.city,
        state: raw.state,
        country: raw.country.unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        bedrooms: raw.bedrooms.unwrap_or(0),
        bathrooms: raw.bathrooms.unwrap_or(0.0),
        property_type: raw
            .property_type
            .unwrap_or_else(|| DEFAULT_PROPERTY_TYPE.to_string()),
        area_sqft: raw.area_sqft,
        lot_size_sqft: raw.lot_size_sqft,
        year_built: raw.year_built,
        parking_spaces: raw.parking_spaces,
        hoa_fee: raw.hoa_fee,
        description: raw.description,
        images: raw.images.unwrap_or_default(),
        features: raw.features.unwrap_or_default(),
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text(doc: &Document, key: &str) -> Option<String> {
    doc.get(key).and_then(Value::as_str).map(str::to_string)
}

fn integer(doc: &Document, key: &str) -> Option<i64> {
    let value = doc.get(key)?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn unsigned(doc: &Document, key: &str) -> Option<u64> {
    let value = doc.get(key)?;
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

fn strings(doc: &Document, key: &str) -> Option<Vec<String>> {
    doc.get(key).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().unwrap().clone()
    }

    fn from_json(value: Value) -> Property {
        normalize(RawProperty::from_document(&doc(value)))
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let property = from_json(json!({"_id": "abc", "title": "Cabin"}));

        assert_eq!(property.id, "abc");
        assert_eq!(property.title.as_deref(), Some("Cabin"));
        assert_eq!(property.bedrooms, 0);
        assert_eq!(property.bathrooms, 0.0);
        assert!(property.images.is_empty());
        assert!(property.features.is_empty());
        assert_eq!(property.currency, "USD");
        assert_eq!(property.country, "USA");
        assert_eq!(property.property_type, "house");
        assert!(property.price.is_none());
        assert!(property.status.is_none());
    }

    #[test]
    fn test_empty_document_never_fails() {
        let property = from_json(json!({}));
        assert_eq!(property.id, "");

        let value = serde_json::to_value(&property).unwrap();
        assert_eq!(value["title"], Value::Null);
        assert_eq!(value["images"], json!([]));
        assert_eq!(value["bathrooms"], json!(0.0));
    }

    #[test]
    fn test_present_fields_pass_through() {
        let property = from_json(json!({
            "_id": "p1",
            "title": "Villa",
            "status": "rent",
            "price": 3500,
            "currency": "EUR",
            "address": "2 Via Roma",
            "city": "Rome",
            "country": "Italy",
            "bedrooms": 3,
            "bathrooms": 2.5,
            "property_type": "villa",
            "year_built": 1890,
            "hoa_fee": 0,
            "images": ["a.jpg", "b.jpg"],
            "features": ["garden"]
        }));

        assert_eq!(property.status, Some(PropertyStatus::Rent));
        assert_eq!(property.price, Some(3500));
        assert_eq!(property.currency, "EUR");
        assert_eq!(property.country, "Italy");
        assert_eq!(property.bedrooms, 3);
        assert_eq!(property.bathrooms, 2.5);
        assert_eq!(property.year_built, Some(1890));
        assert_eq!(property.hoa_fee, Some(0));
        assert_eq!(property.images, vec!["a.jpg", "b.jpg"]);
        assert_eq!(property.features, vec!["garden"]);
    }

    #[test]
    fn test_wrong_types_count_as_absent() {
        let property = from_json(json!({
            "title": 42,
            "status": "sold",
            "price": "expensive",
            "bedrooms": null,
            "bathrooms": "two",
            "currency": null,
            "images": "a.jpg",
            "features": {"pool": true}
        }));

        assert!(property.title.is_none());
        assert!(property.status.is_none());
        assert!(property.price.is_none());
        assert_eq!(property.bedrooms, 0);
        assert_eq!(property.bathrooms, 0.0);
        assert_eq!(property.currency, "USD");
        assert!(property.images.is_empty());
        assert!(property.features.is_empty());
    }

    #[test]
    fn test_numeric_leniency() {
        let raw = RawProperty::from_document(&doc(json!({
            "_id": 17,
            "price": 250000.0,
            "bedrooms": -2,
            "bathrooms": -1.0,
            "area_sqft": 1200.5,
            "parking_spaces": 2.0
        })));

        assert_eq!(raw.id.as_deref(), Some("17"));
        assert_eq!(raw.price, Some(250000));
        assert!(raw.bedrooms.is_none());
        assert!(raw.bathrooms.is_none());
        assert!(raw.area_sqft.is_none());
        assert_eq!(raw.parking_spaces, Some(2));
    }

    #[test]
    fn test_arrays_keep_only_strings() {
        let property = from_json(json!({"images": ["a.jpg", 3, null, "b.jpg"]}));
        assert_eq!(property.images, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_normalize_is_stable() {
        let property = from_json(json!({"_id": "x", "bedrooms": 2}));
        let again = from_json(serde_json::to_value(&property).unwrap());
        // `id` is not `_id`, so only the identifier is lost on re-normalization
        assert_eq!(Property { id: "x".to_string(), ..again }, property);
    }
}
