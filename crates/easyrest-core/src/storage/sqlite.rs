//! SQLite document store.
//!
//! Every slug shares one `documents` table. Documents are stored as JSON text
//! and listed in insertion order via an autoincrement sequence column. Each
//! call runs on tokio's blocking pool so a slow disk never stalls the
//! runtime's worker threads.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use uuid::Uuid;

use super::traits::{Repo, StoreResult};
use super::types::{with_identity, Document, PageResult, DEFAULT_ID_FIELD};
use crate::error::StoreError;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    slug TEXT NOT NULL,
    id TEXT NOT NULL,
    data_json TEXT NOT NULL,
    UNIQUE (slug, id)
);
CREATE INDEX IF NOT EXISTS idx_documents_slug_seq ON documents (slug, seq);
"#;

/// SQLite-backed [`Repo`].
pub struct SqliteRepo {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRepo {
    /// Open (or create) a database file.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::new(format!(
                        "Failed to create store directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the locked connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| StoreError::new("SQLite connection poisoned"))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::new(format!("SQLite task failed: {}", e)))?
    }
}

fn parse_document(raw: &str) -> StoreResult<Document> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::new(format!(
            "Stored document is not an object: {}",
            other
        ))),
    }
}

/// SQLite integers are signed; anything past `i64::MAX` reads as "no more rows".
fn clamp_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl Repo for SqliteRepo {
    async fn get(&self, slug: &str, id: &str) -> StoreResult<Option<Document>> {
        let (slug, id) = (slug.to_string(), id.to_string());
        self.with_conn(move |conn| {
            let raw: Option<String> = conn
                .query_row(
                    "SELECT data_json FROM documents WHERE slug = ?1 AND id = ?2",
                    params![slug, id],
                    |row| row.get(0),
                )
                .optional()?;
            raw.as_deref().map(parse_document).transpose()
        })
        .await
    }

    async fn list(&self, slug: &str, page: u64, size: u64) -> StoreResult<PageResult> {
        let slug = slug.to_string();
        let limit = clamp_sql_int(size);
        let offset = clamp_sql_int(page.saturating_mul(size));

        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT data_json FROM documents WHERE slug = ?1 ORDER BY seq LIMIT ?2 OFFSET ?3",
            )?;
            let rows =
                stmt.query_map(params![slug, limit, offset], |row| row.get::<_, String>(0))?;
            let mut result = Vec::new();
            for raw in rows {
                result.push(parse_document(&raw?)?);
            }

            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM documents WHERE slug = ?1",
                params![slug],
                |row| row.get(0),
            )?;

            Ok(PageResult {
                result,
                page,
                size,
                total_count: total.max(0) as u64,
            })
        })
        .await
    }

    async fn create(&self, slug: &str, data: Document, id: Option<&str>) -> StoreResult<String> {
        let slug = slug.to_string();
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::now_v7().to_string());
        let data_json = serde_json::to_string(&with_identity(data, DEFAULT_ID_FIELD, &id))?;

        self.with_conn(move |conn| {
            conn.execute(
                r#"
                INSERT INTO documents (slug, id, data_json) VALUES (?1, ?2, ?3)
                ON CONFLICT (slug, id) DO UPDATE SET data_json = excluded.data_json
                "#,
                params![slug, id, data_json],
            )?;
            Ok(id)
        })
        .await
    }

    async fn replace(&self, slug: &str, id: &str, data: Document) -> StoreResult<()> {
        let data_json = serde_json::to_string(&with_identity(data, DEFAULT_ID_FIELD, id))?;
        let (slug, id) = (slug.to_string(), id.to_string());
        self.with_conn(move |conn| {
            conn.execute(
                "UPDATE documents SET data_json = ?3 WHERE slug = ?1 AND id = ?2",
                params![slug, id, data_json],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, slug: &str, id: &str) -> StoreResult<()> {
        let (slug, id) = (slug.to_string(), id.to_string());
        self.with_conn(move |conn| {
            conn.execute(
                "DELETE FROM documents WHERE slug = ?1 AND id = ?2",
                params![slug, id],
            )?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_round_trip_in_memory() {
        let repo = SqliteRepo::open_in_memory().unwrap();

        let id = repo
            .create("users", doc(json!({"name": "karl", "tags": ["a"]})), None)
            .await
            .unwrap();

        let stored = repo.get("users", &id).await.unwrap().unwrap();
        assert_eq!(stored["name"], "karl");
        assert_eq!(stored["tags"], json!(["a"]));
        assert_eq!(stored["id"], Value::String(id));
    }

    #[tokio::test]
    async fn test_missing_document_is_none() {
        let repo = SqliteRepo::open_in_memory().unwrap();
        assert!(repo.get("users", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_keeps_identity() {
        let repo = SqliteRepo::open_in_memory().unwrap();
        repo.create("users", doc(json!({"name": "a"})), Some("u1")).await.unwrap();

        repo.replace("users", "u1", doc(json!({"name": "b", "id": "other"})))
            .await
            .unwrap();

        let stored = repo.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(stored["name"], "b");
        assert_eq!(stored["id"], "u1");
    }

    #[tokio::test]
    async fn test_corrupt_row_is_store_error() {
        let repo = SqliteRepo::open_in_memory().unwrap();
        repo.with_conn(|conn| {
            conn.execute(
                "INSERT INTO documents (slug, id, data_json) VALUES ('users', 'bad', '[1]')",
                [],
            )?;
            Ok(())
        })
        .await
        .unwrap();

        let err = repo.get("users", "bad").await.unwrap_err();
        assert!(err.message.contains("not an object"));
    }

    #[tokio::test]
    async fn test_page_past_i64_range_is_empty() {
        let repo = SqliteRepo::open_in_memory().unwrap();
        repo.create("users", doc(json!({"name": "a"})), None).await.unwrap();

        let page = repo.list("users", u64::MAX / 2, 30).await.unwrap();
        assert!(page.result.is_empty());
        assert_eq!(page.total_count, 1);
        assert_eq!(page.page, u64::MAX / 2);
    }
}
