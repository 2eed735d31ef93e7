//! Store trait for document backends
//!
//! Every backend (in-memory, SQLite) implements [`DocumentStore`], giving the
//! listing domain a single interface that can be injected and swapped in tests.

use async_trait::async_trait;

use crate::data::document::Document;
use crate::data::error::DataError;
use crate::data::predicate::Predicate;

/// Document store operations consumed by the listing domain
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return up to `limit` documents of `collection` matching `predicate`,
    /// in insertion order. Each document carries its identifier under `_id`.
    async fn find(
        &self,
        collection: &str,
        predicate: &Predicate,
        limit: u32,
    ) -> Result<Vec<Document>, DataError>;

    /// Persist a new document and return the identifier the store assigned.
    /// Any `_id` already present in `document` is ignored.
    async fn insert(&self, collection: &str, document: Document) -> Result<String, DataError>;

    /// Names of the collections holding at least one document, sorted
    async fn list_collections(&self) -> Result<Vec<String>, DataError>;

    /// Health check (validates connection)
    async fn health_check(&self) -> Result<(), DataError>;

    /// Backend name for debugging/logging
    fn backend_name(&self) -> &'static str;
}
