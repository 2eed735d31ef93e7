//! Schemaless document representation shared by all store backends

use serde_json::{Map, Value};

/// Field holding the store-assigned identifier in returned documents
pub const ID_FIELD: &str = "_id";

/// A stored record: field name to JSON value, any field may be absent
pub type Document = Map<String, Value>;

/// Build the returned form of a stored document (identifier first, then body)
pub fn with_id(id: &str, body: &Document) -> Document {
    let mut doc = Document::with_capacity(body.len() + 1);
    doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    for (key, value) in body {
        if key != ID_FIELD {
            doc.insert(key.clone(), value.clone());
        }
    }
    doc
}

/// Lower-cased copy of the text fields of a body, other fields dropped
///
/// Backends that cannot fold Unicode case natively compare against this
/// shadow so that case-insensitive matching agrees with `str::to_lowercase`.
pub fn fold_text(body: &Document) -> Document {
    body.iter()
        .filter_map(|(key, value)| {
            value
                .as_str()
                .map(|s| (key.clone(), Value::String(s.to_lowercase())))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_id_puts_id_first() {
        let body = json!({"title": "Loft", "price": 10}).as_object().unwrap().clone();
        let doc = with_id("abc", &body);

        let keys: Vec<&str> = doc.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["_id", "title", "price"]);
        assert_eq!(doc["_id"], "abc");
    }

    #[test]
    fn test_with_id_overrides_stale_id_in_body() {
        let body = json!({"_id": "old", "title": "Loft"}).as_object().unwrap().clone();
        let doc = with_id("new", &body);

        assert_eq!(doc.len(), 2);
        assert_eq!(doc["_id"], "new");
    }

    #[test]
    fn test_fold_text_lowercases_strings_only() {
        let body = json!({"city": "MÜNCHEN", "title": "Straße", "price": 10, "images": ["A"]})
            .as_object()
            .unwrap()
            .clone();
        let folded = fold_text(&body);

        assert_eq!(folded.len(), 2);
        assert_eq!(folded["city"], "münchen");
        assert_eq!(folded["title"], "straße");
    }
}
