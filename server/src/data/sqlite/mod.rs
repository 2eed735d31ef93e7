//! SQLite document store
//!
//! Embedded backend for listing documents. Bodies are stored as JSON text and
//! queried with SQLite's JSON functions. Optimized for single-node use with:
//! - WAL mode for concurrent reads during writes
//! - In-memory temp storage for fast queries
//! - Automatic WAL checkpointing
//!
//! All schema definitions and migrations are managed here.

pub mod error;
mod migrations;
pub mod query;
pub mod repositories;
mod repository_impl;
pub mod schema;

pub use error::SqliteError;
pub use sqlx::SqlitePool;

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::log::LevelFilter;

use crate::core::constants::{
    SQLITE_BUSY_TIMEOUT_SECS, SQLITE_CACHE_SIZE, SQLITE_CHECKPOINT_INTERVAL_SECS,
    SQLITE_MAX_CONNECTIONS, SQLITE_WAL_AUTOCHECKPOINT,
};

/// SQLite document store
///
/// Handles database initialization, connection pooling, and background tasks.
/// Created once at server startup and shared through `StoreService`.
pub struct SqliteStore {
    pool: SqlitePool,
    in_memory: bool,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`
    ///
    /// Configures connection options with optimized pragmas and runs any
    /// pending migrations.
    pub async fn init(path: &Path) -> Result<Self, SqliteError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(SQLITE_BUSY_TIMEOUT_SECS))
            .pragma("cache_size", SQLITE_CACHE_SIZE)
            .pragma("temp_store", "MEMORY")
            .pragma("wal_autocheckpoint", SQLITE_WAL_AUTOCHECKPOINT)
            .log_statements(LevelFilter::Trace);

        let pool = SqlitePoolOptions::new()
            .max_connections(SQLITE_MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;

        tracing::debug!(path = %path.display(), "SqliteStore initialized");
        Ok(Self {
            pool,
            in_memory: false,
        })
    }

    /// Open a private in-memory database
    ///
    /// Uses a single pooled connection that is never recycled, since each
    /// connection to `:memory:` sees its own database.
    pub async fn in_memory() -> Result<Self, SqliteError> {
        let options =
            SqliteConnectOptions::from_str("sqlite::memory:")?.log_statements(LevelFilter::Trace);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;

        tracing::debug!("SqliteStore initialized in memory");
        Ok(Self {
            pool,
            in_memory: true,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn checkpoint(&self) -> Result<(), SqliteError> {
        if self.in_memory {
            return Ok(());
        }
        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(&self.pool)
            .await?;
        tracing::debug!("WAL checkpoint completed");
        Ok(())
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("SQLite pool closed");
    }

    pub fn start_checkpoint_task(
        self: &Arc<Self>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let db = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(SQLITE_CHECKPOINT_INTERVAL_SECS));
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::debug!("WAL checkpoint task shutting down");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        if let Err(e) = db.checkpoint().await {
                            tracing::warn!("WAL checkpoint failed: {}", e);
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_file_and_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("estate.db");

        let store = SqliteStore::init(&path).await.unwrap();
        assert!(path.exists());

        store.checkpoint().await.unwrap();
        store.close().await;
    }

    #[tokio::test]
    async fn test_reopen_keeps_documents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("estate.db");
        let body = serde_json::json!({"title": "Kept"})
            .as_object()
            .unwrap()
            .clone();

        let store = SqliteStore::init(&path).await.unwrap();
        repositories::insert_document(store.pool(), "property", body)
            .await
            .unwrap();
        store.close().await;

        let reopened = SqliteStore::init(&path).await.unwrap();
        let names = repositories::list_collections(reopened.pool()).await.unwrap();
        assert_eq!(names, vec!["property".to_string()]);
    }

    #[tokio::test]
    async fn test_checkpoint_task_stops_on_shutdown() {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let (tx, rx) = watch::channel(false);

        let handle = store.start_checkpoint_task(rx);
        tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
