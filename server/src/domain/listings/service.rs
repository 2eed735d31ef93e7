//! Listing search and creation over an injected document store

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::core::constants::{DEFAULT_COLLECTION, DIAGNOSTICS_MAX_COLLECTIONS};
use crate::data::{DataError, Document, DocumentStore};

use super::compiler::compile;
use super::criteria::SearchCriteria;
use super::normalize::{RawProperty, normalize};
use super::property::{NewProperty, Property};

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Document store is not available")]
    StoreUnavailable,
    #[error(transparent)]
    Store(#[from] DataError),
}

/// Store state as reported by the health endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoreDiagnostics {
    pub available: bool,
    pub connected: bool,
    pub backend: Option<String>,
    pub collection: String,
    /// First collections present in the store
    pub collections: Vec<String>,
    pub error: Option<String>,
}

/// Listing operations
///
/// The store is optional so the service can run degraded when the store
/// failed to initialize; every operation then reports `StoreUnavailable`.
#[derive(Clone)]
pub struct ListingService {
    store: Option<Arc<dyn DocumentStore>>,
    collection: String,
}

impl ListingService {
    pub fn new(store: Option<Arc<dyn DocumentStore>>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Service over the default `property` collection
    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Self::new(Some(store), DEFAULT_COLLECTION)
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> Result<&Arc<dyn DocumentStore>, ListingError> {
        self.store.as_ref().ok_or(ListingError::StoreUnavailable)
    }

    /// Find listings matching `criteria`, at most `limit`, in store order
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        limit: u32,
    ) -> Result<Vec<Property>, ListingError> {
        let store = self.store()?;
        let predicate = compile(criteria);
        tracing::debug!(
            collection = %self.collection,
            status = %criteria.status,
            limit,
            predicate = ?predicate,
            "Searching listings"
        );

        let docs = store.find(&self.collection, &predicate, limit).await?;
        let results: Vec<Property> = docs
            .iter()
            .map(|doc| normalize(RawProperty::from_document(doc)))
            .collect();

        tracing::debug!(count = results.len(), "Search complete");
        Ok(results)
    }

    /// Persist a new listing and return its identifier
    pub async fn create(&self, property: &NewProperty) -> Result<String, ListingError> {
        let store = self.store()?;
        let body: Document = match serde_json::to_value(property).map_err(DataError::from)? {
            serde_json::Value::Object(map) => map,
            _ => Document::new(),
        };

        let id = store.insert(&self.collection, body).await?;
        tracing::debug!(collection = %self.collection, id = %id, "Listing created");
        Ok(id)
    }

    /// Report store availability; store errors are captured, not returned
    pub async fn diagnostics(&self) -> StoreDiagnostics {
        let mut diagnostics = StoreDiagnostics {
            available: self.store.is_some(),
            connected: false,
            backend: None,
            collection: self.collection.clone(),
            collections: Vec::new(),
            error: None,
        };

        let Some(store) = &self.store else {
            return diagnostics;
        };
        diagnostics.backend = Some(store.backend_name().to_string());

        if let Err(e) = store.health_check().await {
            tracing::debug!(error = %e, "Store health check failed");
            diagnostics.error = Some(e.to_string());
            return diagnostics;
        }
        diagnostics.connected = true;

        match store.list_collections().await {
            Ok(mut names) => {
                names.truncate(DIAGNOSTICS_MAX_COLLECTIONS);
                diagnostics.collections = names;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Listing collections failed");
                diagnostics.error = Some(e.to_string());
            }
        }
        diagnostics
    }
}
