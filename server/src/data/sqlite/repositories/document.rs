//! Document repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::document::{self, Document, ID_FIELD};
use crate::data::predicate::{Predicate, Scalar};
use crate::data::sqlite::SqliteError;
use crate::data::sqlite::query::{SqlParams, to_sql};

/// Insert a document into a collection, returning its generated id
pub async fn insert_document(
    pool: &SqlitePool,
    collection: &str,
    mut body: Document,
) -> Result<String, SqliteError> {
    body.remove(ID_FIELD);
    let id = cuid2::create_id();
    let encoded = serde_json::to_string(&body)?;
    let folded = serde_json::to_string(&document::fold_text(&body))?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO documents (id, collection, body, folded, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(collection)
    .bind(&encoded)
    .bind(&folded)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Find documents matching a predicate, in insertion order, at most `limit`
pub async fn find_documents(
    pool: &SqlitePool,
    collection: &str,
    predicate: &Predicate,
    limit: u32,
) -> Result<Vec<Document>, SqliteError> {
    let mut params = SqlParams::default();
    let clause = to_sql(predicate, &mut params);
    let sql = format!(
        "SELECT id, body FROM documents WHERE collection = ? AND {} ORDER BY seq LIMIT ?",
        clause
    );

    let mut query = sqlx::query_as::<_, (String, String)>(&sql).bind(collection);
    for value in params.values {
        query = match value {
            Scalar::Text(s) => query.bind(s),
            Scalar::Integer(i) => query.bind(i),
            Scalar::Number(f) => query.bind(f),
        };
    }
    let rows = query.bind(i64::from(limit)).fetch_all(pool).await?;

    let mut docs = Vec::with_capacity(rows.len());
    for (id, body) in rows {
        match serde_json::from_str::<Document>(&body) {
            Ok(body) => docs.push(document::with_id(&id, &body)),
            Err(e) => tracing::warn!(id = %id, error = %e, "Skipping undecodable document"),
        }
    }
    Ok(docs)
}

/// List distinct collection names that hold at least one document
pub async fn list_collections(pool: &SqlitePool) -> Result<Vec<String>, SqliteError> {
    let names: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT collection FROM documents ORDER BY collection")
            .fetch_all(pool)
            .await?;
    Ok(names)
}
