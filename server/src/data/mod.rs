//! Data storage layer
//!
//! Provides document storage for the application:
//! - `memory` - In-process store for development and tests
//! - `sqlite` - Embedded persistent store with JSON bodies
//! - `document` - Schemaless document representation
//! - `predicate` - Typed query language shared by all backends
//! - `traits` - The `DocumentStore` trait implemented by each backend
//! - `error` - Unified error type for all backends

pub mod document;
pub mod error;
pub mod memory;
pub mod predicate;
pub mod sqlite;
pub mod traits;

pub use document::Document;
pub use error::DataError;
pub use memory::InMemoryStore;
pub use predicate::{Predicate, Scalar};
pub use sqlite::SqliteStore;
pub use traits::DocumentStore;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::config::{DatabaseConfig, StoreBackend};
use crate::core::constants::{SQLITE_DB_FILENAME, SQLITE_MEMORY_PATH};
use crate::core::storage::{AppStorage, DataSubdir};

/// Document store service enum
///
/// Wraps the backend selected by configuration. Services are stored as Arc
/// so the store can be handed to the domain layer as a trait object.
pub enum StoreService {
    /// In-memory backend (non-persistent)
    Memory(Arc<InMemoryStore>),
    /// SQLite backend (default, embedded)
    Sqlite(Arc<SqliteStore>),
}

impl StoreService {
    /// Initialize the store based on configuration
    ///
    /// For SQLite, an explicit path (or `:memory:`) takes precedence over the
    /// default file under the data directory.
    pub async fn init(config: &DatabaseConfig, storage: &AppStorage) -> Result<Self, DataError> {
        match config.backend {
            StoreBackend::Memory => Ok(Self::Memory(Arc::new(InMemoryStore::new()))),
            StoreBackend::Sqlite => {
                let store = match config.sqlite.path.as_deref() {
                    Some(SQLITE_MEMORY_PATH) => SqliteStore::in_memory().await?,
                    Some(path) => SqliteStore::init(&PathBuf::from(path)).await?,
                    None => {
                        let path = storage.subdir(DataSubdir::Sqlite).join(SQLITE_DB_FILENAME);
                        SqliteStore::init(&path).await?
                    }
                };
                Ok(Self::Sqlite(Arc::new(store)))
            }
        }
    }

    /// Get the store as a trait object for the domain layer
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        match self {
            Self::Memory(m) => Arc::clone(m) as Arc<dyn DocumentStore>,
            Self::Sqlite(s) => Arc::new(Arc::clone(s)),
        }
    }

    /// Get the backend type
    pub fn backend(&self) -> StoreBackend {
        match self {
            Self::Memory(_) => StoreBackend::Memory,
            Self::Sqlite(_) => StoreBackend::Sqlite,
        }
    }

    /// Start the background checkpoint task (SQLite only)
    pub fn start_checkpoint_task(
        &self,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Option<JoinHandle<()>> {
        match self {
            Self::Memory(_) => None,
            Self::Sqlite(s) => Some(s.start_checkpoint_task(shutdown_rx)),
        }
    }

    /// Close the store gracefully
    pub async fn close(&self) {
        match self {
            Self::Memory(_) => {}
            Self::Sqlite(s) => s.close().await,
        }
    }
}
