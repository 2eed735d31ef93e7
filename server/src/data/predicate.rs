//! Typed query predicate
//!
//! The query language understood by every `DocumentStore` backend. The
//! in-memory store evaluates predicates directly via [`Predicate::matches`];
//! the SQLite store translates them to SQL (see `data::sqlite::query`).
//!
//! Leaf semantics follow document-store rules: a missing field, a null, or a
//! value of the wrong JSON type never satisfies a leaf constraint.

use std::cmp::Ordering;

use serde_json::Value;

use super::document::Document;

/// Comparable literal used in predicates and as a SQL bind value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Number(f64),
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Composed boolean condition over document fields
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact, type-sensitive equality
    Equals { field: String, value: Scalar },
    /// Case-insensitive, anchored string equality
    EqualsCi { field: String, value: String },
    /// Case-insensitive substring match
    ContainsCi { field: String, value: String },
    /// field >= value
    RangeGte { field: String, value: Scalar },
    /// field <= value
    RangeLte { field: String, value: Scalar },
    /// At least one branch matches (empty: matches nothing)
    Or(Vec<Predicate>),
    /// Every branch matches (empty: matches everything)
    And(Vec<Predicate>),
}

impl Predicate {
    pub fn equals(field: &str, value: impl Into<Scalar>) -> Self {
        Self::Equals {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn equals_ci(field: &str, value: &str) -> Self {
        Self::EqualsCi {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn contains_ci(field: &str, value: &str) -> Self {
        Self::ContainsCi {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn gte(field: &str, value: impl Into<Scalar>) -> Self {
        Self::RangeGte {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn lte(field: &str, value: impl Into<Scalar>) -> Self {
        Self::RangeLte {
            field: field.to_string(),
            value: value.into(),
        }
    }

    /// Evaluate against a raw document
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::Equals { field, value } => doc
                .get(field)
                .is_some_and(|v| compare(v, value) == Some(Ordering::Equal)),
            Self::EqualsCi { field, value } => text(doc, field)
                .is_some_and(|s| s.to_lowercase() == value.to_lowercase()),
            Self::ContainsCi { field, value } => text(doc, field)
                .is_some_and(|s| s.to_lowercase().contains(&value.to_lowercase())),
            Self::RangeGte { field, value } => doc
                .get(field)
                .and_then(|v| compare(v, value))
                .is_some_and(|ord| ord != Ordering::Less),
            Self::RangeLte { field, value } => doc
                .get(field)
                .and_then(|v| compare(v, value))
                .is_some_and(|ord| ord != Ordering::Greater),
            Self::Or(branches) => branches.iter().any(|p| p.matches(doc)),
            Self::And(branches) => branches.iter().all(|p| p.matches(doc)),
        }
    }
}

fn text<'a>(doc: &'a Document, field: &str) -> Option<&'a str> {
    doc.get(field).and_then(Value::as_str)
}

/// Order a stored value against a literal; `None` when the types differ
fn compare(stored: &Value, literal: &Scalar) -> Option<Ordering> {
    match (stored, literal) {
        (Value::String(s), Scalar::Text(t)) => Some(s.as_str().cmp(t.as_str())),
        (Value::Number(n), Scalar::Integer(i)) => match n.as_i64() {
            Some(stored) => Some(stored.cmp(i)),
            None => n.as_f64()?.partial_cmp(&(*i as f64)),
        },
        (Value::Number(n), Scalar::Number(f)) => n.as_f64()?.partial_cmp(f),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_equals_is_type_sensitive() {
        let d = doc(json!({"status": "sale", "bedrooms": 3}));

        assert!(Predicate::equals("status", "sale").matches(&d));
        assert!(!Predicate::equals("status", "Sale").matches(&d));
        assert!(Predicate::equals("bedrooms", 3).matches(&d));
        assert!(!Predicate::equals("bedrooms", "3").matches(&d));
    }

    #[test]
    fn test_equals_ci_is_anchored() {
        let d = doc(json!({"city": "Austin"}));

        assert!(Predicate::equals_ci("city", "austin").matches(&d));
        assert!(Predicate::equals_ci("city", "AUSTIN").matches(&d));
        assert!(!Predicate::equals_ci("city", "Aust").matches(&d));
        assert!(!Predicate::equals_ci("city", "Austin TX").matches(&d));
    }

    #[test]
    fn test_contains_ci_matches_substring() {
        let d = doc(json!({"title": "Sunny Loft Downtown"}));

        assert!(Predicate::contains_ci("title", "loft").matches(&d));
        assert!(Predicate::contains_ci("title", "").matches(&d));
        assert!(!Predicate::contains_ci("title", "cabin").matches(&d));
    }

    #[test]
    fn test_pattern_characters_are_literal() {
        let d = doc(json!({"title": "Loft"}));

        assert!(!Predicate::contains_ci("title", "L.ft").matches(&d));
        assert!(!Predicate::equals_ci("city", ".*").matches(&doc(json!({"city": "Austin"}))));
    }

    #[test]
    fn test_ranges_mix_integer_and_float() {
        let d = doc(json!({"price": 250000, "bathrooms": 2.5}));

        assert!(Predicate::gte("price", 250000).matches(&d));
        assert!(Predicate::lte("price", 250000).matches(&d));
        assert!(!Predicate::gte("price", 250001).matches(&d));
        assert!(Predicate::gte("bathrooms", 2.0).matches(&d));
        assert!(Predicate::gte("bathrooms", 2).matches(&d));
        assert!(!Predicate::gte("bathrooms", 3).matches(&d));
    }

    #[test]
    fn test_missing_null_or_mistyped_field_never_matches() {
        let d = doc(json!({"price": "cheap", "city": null, "bedrooms": 2}));

        assert!(!Predicate::gte("price", 0).matches(&d));
        assert!(!Predicate::lte("price", 1_000_000).matches(&d));
        assert!(!Predicate::equals_ci("city", "").matches(&d));
        assert!(!Predicate::contains_ci("state", "").matches(&d));
        assert!(!Predicate::contains_ci("bedrooms", "2").matches(&d));
    }

    #[test]
    fn test_empty_combinators() {
        let d = doc(json!({}));

        assert!(Predicate::And(vec![]).matches(&d));
        assert!(!Predicate::Or(vec![]).matches(&d));
    }

    #[test]
    fn test_nested_or_inside_and() {
        let d = doc(json!({"status": "rent", "title": "Condo", "city": "Denver"}));
        let predicate = Predicate::And(vec![
            Predicate::equals("status", "rent"),
            Predicate::Or(vec![
                Predicate::contains_ci("title", "denver"),
                Predicate::contains_ci("city", "denver"),
            ]),
        ]);

        assert!(predicate.matches(&d));
    }

    #[test]
    fn test_contradictory_range_matches_nothing() {
        let d = doc(json!({"price": 150}));
        let predicate = Predicate::And(vec![
            Predicate::gte("price", 200),
            Predicate::lte("price", 100),
        ]);

        assert!(!predicate.matches(&d));
    }
}
