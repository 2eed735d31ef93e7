//! Database migration system
//!
//! Handles schema versioning. Version 1 is the initial schema; fresh
//! databases get the latest schema directly and skip later migrations.

use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use super::error::SqliteError;
use super::schema::{MIGRATION_V2_FOLDED, SCHEMA, SCHEMA_VERSION};
use crate::data::document::{Document, fold_text};

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteError> {
    let table_exists: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        tracing::debug!(
            "Initializing database with schema version {}",
            SCHEMA_VERSION
        );
        apply_initial_schema(pool).await?;
        return Ok(());
    }

    let current_version: i32 =
        sqlx::query_scalar("SELECT version FROM schema_version WHERE id = 1")
            .fetch_optional(pool)
            .await?
            .unwrap_or(0);

    if current_version >= SCHEMA_VERSION {
        tracing::debug!(
            "Database schema is up to date (version {})",
            current_version
        );
        return Ok(());
    }

    for version in (current_version + 1)..=SCHEMA_VERSION {
        tracing::debug!("Applying migration to version {}", version);
        apply_migration(pool, version).await?;
    }

    Ok(())
}

/// Apply the initial schema (version 1)
async fn apply_initial_schema(pool: &SqlitePool) -> Result<(), SqliteError> {
    let start = std::time::Instant::now();

    let mut tx = pool.begin().await?;

    sqlx::query(SCHEMA).execute(&mut *tx).await?;

    let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);
    sqlx::query(
        "INSERT INTO schema_version (id, version, applied_at, description) VALUES (1, ?, ?, 'Initial schema')",
    )
    .bind(SCHEMA_VERSION)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let digest = checksum(SCHEMA);
    let elapsed_ms = start.elapsed().as_millis() as i64;
    sqlx::query(
        "INSERT INTO schema_migrations (version, name, applied_at, checksum, execution_time_ms, success) VALUES (?, ?, ?, ?, ?, 1)",
    )
    .bind(SCHEMA_VERSION)
    .bind("initial_schema")
    .bind(now)
    .bind(&digest)
    .bind(elapsed_ms)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!("Applied initial schema in {}ms", elapsed_ms);
    Ok(())
}

/// Hex-encoded SHA-256 of migration SQL, recorded to detect edited migrations
fn checksum(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}

async fn apply_migration(pool: &SqlitePool, version: i32) -> Result<(), SqliteError> {
    match version {
        // Already handled by initial schema
        1 => Ok(()),
        2 => migrate_v2_folded(pool).await.map_err(|e| SqliteError::MigrationFailed {
            version,
            name: "folded_text".to_string(),
            error: e.to_string(),
        }),
        _ => Err(SqliteError::MigrationFailed {
            version,
            name: "unknown".to_string(),
            error: format!("Unknown migration version: {}", version),
        }),
    }
}

/// Add the `folded` column and backfill it from existing bodies
async fn migrate_v2_folded(pool: &SqlitePool) -> Result<(), SqliteError> {
    let start = std::time::Instant::now();
    let mut tx = pool.begin().await?;

    sqlx::query(MIGRATION_V2_FOLDED).execute(&mut *tx).await?;

    let rows: Vec<(i64, String)> = sqlx::query_as("SELECT seq, body FROM documents")
        .fetch_all(&mut *tx)
        .await?;
    for (seq, body) in &rows {
        let Ok(body) = serde_json::from_str::<Document>(body) else {
            tracing::warn!(seq, "Leaving undecodable document unfolded");
            continue;
        };
        sqlx::query("UPDATE documents SET folded = ? WHERE seq = ?")
            .bind(serde_json::to_string(&fold_text(&body))?)
            .bind(seq)
            .execute(&mut *tx)
            .await?;
    }

    let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);
    let elapsed_ms = start.elapsed().as_millis() as i64;
    sqlx::query(
        "INSERT INTO schema_migrations (version, name, applied_at, checksum, execution_time_ms, success) VALUES (2, 'folded_text', ?, ?, ?, 1)",
    )
    .bind(now)
    .bind(checksum(MIGRATION_V2_FOLDED))
    .bind(elapsed_ms)
    .execute(&mut *tx)
    .await?;
    sqlx::query("UPDATE schema_version SET version = 2, applied_at = ?, description = 'Folded text' WHERE id = 1")
        .bind(now)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::debug!(documents = rows.len(), "Backfilled folded text in {}ms", elapsed_ms);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_pool() -> SqlitePool {
        sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_fresh_database_gets_initial_schema() {
        let pool = memory_pool().await;
        run_migrations(&pool).await.unwrap();

        let version: i32 = sqlx::query_scalar("SELECT version FROM schema_version WHERE id = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);

        let checksum: String =
            sqlx::query_scalar("SELECT checksum FROM schema_migrations WHERE version = 2")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(checksum, super::checksum(SCHEMA));
        assert_eq!(checksum.len(), 64);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = memory_pool().await;
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_unknown_migration_version_fails() {
        let pool = memory_pool().await;
        let err = apply_migration(&pool, 99).await.unwrap_err();
        assert!(err.to_string().contains("Unknown migration version: 99"));
    }

    #[tokio::test]
    async fn test_v1_database_gets_folded_backfill() {
        let pool = memory_pool().await;
        sqlx::query(
            r#"
            CREATE TABLE schema_version (id INTEGER PRIMARY KEY, version INTEGER NOT NULL, applied_at INTEGER NOT NULL, description TEXT);
            CREATE TABLE schema_migrations (version INTEGER PRIMARY KEY, name TEXT NOT NULL, applied_at INTEGER NOT NULL, checksum TEXT NOT NULL, execution_time_ms INTEGER, success INTEGER NOT NULL DEFAULT 1);
            CREATE TABLE documents (seq INTEGER PRIMARY KEY AUTOINCREMENT, id TEXT NOT NULL UNIQUE, collection TEXT NOT NULL, body TEXT NOT NULL, created_at INTEGER NOT NULL);
            INSERT INTO schema_version (id, version, applied_at) VALUES (1, 1, 0);
            INSERT INTO documents (id, collection, body, created_at) VALUES ('a', 'property', '{"city":"MÜNCHEN","price":5}', 0);
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        run_migrations(&pool).await.unwrap();

        let folded: String = sqlx::query_scalar("SELECT folded FROM documents WHERE id = 'a'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(folded, r#"{"city":"münchen"}"#);

        let version: i32 = sqlx::query_scalar("SELECT version FROM schema_version WHERE id = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(version, 2);
    }
}
