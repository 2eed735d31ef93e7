//! DocumentStore trait implementation for SQLite
//!
//! Implements the DocumentStore trait for Arc<SqliteStore>, delegating to the
//! document repository functions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::document::Document;
use crate::data::error::DataError;
use crate::data::predicate::Predicate;
use crate::data::traits::DocumentStore;

use super::SqliteStore;
use super::repositories::document;

#[async_trait]
impl DocumentStore for Arc<SqliteStore> {
    async fn find(
        &self,
        collection: &str,
        predicate: &Predicate,
        limit: u32,
    ) -> Result<Vec<Document>, DataError> {
        document::find_documents(self.pool(), collection, predicate, limit)
            .await
            .map_err(Into::into)
    }

    async fn insert(&self, collection: &str, body: Document) -> Result<String, DataError> {
        document::insert_document(self.pool(), collection, body)
            .await
            .map_err(Into::into)
    }

    async fn list_collections(&self) -> Result<Vec<String>, DataError> {
        document::list_collections(self.pool())
            .await
            .map_err(Into::into)
    }

    async fn health_check(&self) -> Result<(), DataError> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map_err(DataError::from_sqlite)?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_store_roundtrip_through_trait() {
        let store: Arc<SqliteStore> = Arc::new(SqliteStore::in_memory().await.unwrap());
        let dyn_store: &dyn DocumentStore = &store;

        let body = json!({"title": "Loft", "status": "sale"})
            .as_object()
            .unwrap()
            .clone();
        let id = dyn_store.insert("property", body).await.unwrap();

        let found = dyn_store
            .find("property", &Predicate::equals("status", "sale"), 10)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["_id"], json!(id));
        assert_eq!(dyn_store.backend_name(), "sqlite");
        dyn_store.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_health_check_fails_after_close() {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        store.close().await;

        let err = store.health_check().await.unwrap_err();
        assert!(err.is_transient());
    }
}
