//! In-memory document store
//!
//! Keeps each collection as an insertion-ordered vector behind a
//! `parking_lot::RwLock`. Predicates are evaluated directly against the
//! stored JSON. Used for development and tests; contents are lost on exit.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::data::document::{self, Document, ID_FIELD};
use crate::data::error::DataError;
use crate::data::predicate::Predicate;
use crate::data::traits::DocumentStore;

struct StoredDocument {
    id: String,
    body: Document,
}

/// In-memory store implementation
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<BTreeMap<String, Vec<StoredDocument>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    #[cfg(test)]
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, |docs| docs.len())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find(
        &self,
        collection: &str,
        predicate: &Predicate,
        limit: u32,
    ) -> Result<Vec<Document>, DataError> {
        let collections = self.collections.read();
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .iter()
            .filter(|stored| predicate.matches(&stored.body))
            .take(limit as usize)
            .map(|stored| document::with_id(&stored.id, &stored.body))
            .collect())
    }

    async fn insert(&self, collection: &str, mut document: Document) -> Result<String, DataError> {
        document.remove(ID_FIELD);
        let id = cuid2::create_id();

        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                body: document,
            });

        tracing::trace!(collection, id = %id, "Inserted document");
        Ok(id)
    }

    async fn list_collections(&self) -> Result<Vec<String>, DataError> {
        Ok(self
            .collections
            .read()
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn health_check(&self) -> Result<(), DataError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let store = InMemoryStore::new();
        let a = store.insert("property", doc(json!({"title": "A"}))).await.unwrap();
        let b = store.insert("property", doc(json!({"title": "B"}))).await.unwrap();

        assert!(!a.is_empty());
        assert_ne!(a, b);
        assert_eq!(store.len("property"), 2);
    }

    #[tokio::test]
    async fn test_insert_ignores_client_id() {
        let store = InMemoryStore::new();
        let id = store
            .insert("property", doc(json!({"_id": "forged", "title": "A"})))
            .await
            .unwrap();

        let found = store
            .find("property", &Predicate::And(vec![]), 10)
            .await
            .unwrap();
        assert_ne!(id, "forged");
        assert_eq!(found[0]["_id"], json!(id));
    }

    #[tokio::test]
    async fn test_find_preserves_insertion_order_and_limit() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            store
                .insert("property", doc(json!({"n": i, "status": "sale"})))
                .await
                .unwrap();
        }

        let found = store
            .find("property", &Predicate::equals("status", "sale"), 3)
            .await
            .unwrap();
        let ns: Vec<i64> = found.iter().map(|d| d["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_find_unknown_collection_is_empty() {
        let store = InMemoryStore::new();
        let found = store
            .find("missing", &Predicate::And(vec![]), 10)
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_collections_are_isolated_and_listed() {
        let store = InMemoryStore::new();
        store.insert("property", doc(json!({"a": 1}))).await.unwrap();
        store.insert("agent", doc(json!({"a": 1}))).await.unwrap();

        let found = store
            .find("property", &Predicate::And(vec![]), 10)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(
            store.list_collections().await.unwrap(),
            vec!["agent".to_string(), "property".to_string()]
        );
    }
}
