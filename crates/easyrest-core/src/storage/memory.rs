//! In-process document store.
//!
//! Documents live in a per-slug map with a separate insertion-order index so
//! listings are stable. Nothing is persisted.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::traits::{Repo, StoreResult};
use super::types::{with_identity, Document, PageResult, DEFAULT_ID_FIELD};
use crate::error::StoreError;

#[derive(Debug, Default)]
struct Collection {
    order: Vec<String>,
    documents: HashMap<String, Document>,
}

/// Memory-backed [`Repo`].
#[derive(Debug, Default)]
pub struct MemoryRepo {
    collections: Mutex<HashMap<String, Collection>>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `(slug, id, document)` triples, in order.
    pub fn with_documents<I, S, D>(documents: I) -> Self
    where
        I: IntoIterator<Item = (S, D, Document)>,
        S: Into<String>,
        D: Into<String>,
    {
        let mut repo = Self::new();
        if let Ok(collections) = repo.collections.get_mut() {
            for (slug, id, data) in documents {
                let id = id.into();
                let collection = collections.entry(slug.into()).or_default();
                upsert(collection, &id, with_identity(data, DEFAULT_ID_FIELD, &id));
            }
        }
        repo
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<String, Collection>>> {
        self.collections
            .lock()
            .map_err(|_| StoreError::new("Memory store lock poisoned"))
    }
}

fn upsert(collection: &mut Collection, id: &str, data: Document) {
    if collection.documents.insert(id.to_string(), data).is_none() {
        collection.order.push(id.to_string());
    }
}

#[async_trait]
impl Repo for MemoryRepo {
    async fn get(&self, slug: &str, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.lock()?;
        Ok(collections
            .get(slug)
            .and_then(|collection| collection.documents.get(id))
            .cloned())
    }

    async fn list(&self, slug: &str, page: u64, size: u64) -> StoreResult<PageResult> {
        let collections = self.lock()?;
        let (result, total_count) = match collections.get(slug) {
            Some(collection) => {
                let start = usize::try_from(page.saturating_mul(size)).unwrap_or(usize::MAX);
                let take = usize::try_from(size).unwrap_or(usize::MAX);
                let result = collection
                    .order
                    .iter()
                    .skip(start)
                    .take(take)
                    .filter_map(|id| collection.documents.get(id).cloned())
                    .collect();
                (result, collection.order.len() as u64)
            }
            None => (Vec::new(), 0),
        };
        Ok(PageResult {
            result,
            page,
            size,
            total_count,
        })
    }

    async fn create(&self, slug: &str, data: Document, id: Option<&str>) -> StoreResult<String> {
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::now_v7().to_string());
        let mut collections = self.lock()?;
        let collection = collections.entry(slug.to_string()).or_default();
        upsert(collection, &id, with_identity(data, DEFAULT_ID_FIELD, &id));
        Ok(id)
    }

    async fn replace(&self, slug: &str, id: &str, data: Document) -> StoreResult<()> {
        let mut collections = self.lock()?;
        if let Some(stored) = collections
            .get_mut(slug)
            .and_then(|collection| collection.documents.get_mut(id))
        {
            *stored = with_identity(data, DEFAULT_ID_FIELD, id);
        }
        Ok(())
    }

    async fn delete(&self, slug: &str, id: &str) -> StoreResult<()> {
        let mut collections = self.lock()?;
        if let Some(collection) = collections.get_mut(slug) {
            if collection.documents.remove(id).is_some() {
                collection.order.retain(|existing| existing != id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_create_generates_id_and_stamps_document() {
        let repo = MemoryRepo::new();

        let id = repo.create("users", doc(json!({"name": "karl"})), None).await.unwrap();
        assert!(Uuid::parse_str(&id).is_ok());

        let stored = repo.get("users", &id).await.unwrap().unwrap();
        assert_eq!(stored["name"], "karl");
        assert_eq!(stored["id"], Value::String(id.clone()));
    }

    #[tokio::test]
    async fn test_create_with_existing_id_keeps_position() {
        let repo = MemoryRepo::new();
        repo.create("users", doc(json!({"n": 1})), Some("a")).await.unwrap();
        repo.create("users", doc(json!({"n": 2})), Some("b")).await.unwrap();
        repo.create("users", doc(json!({"n": 3})), Some("a")).await.unwrap();

        let page = repo.list("users", 0, 30).await.unwrap();
        assert_eq!(page.total_count, 2);
        assert_eq!(page.result[0]["n"], 3);
        assert_eq!(page.result[1]["n"], 2);
    }

    #[tokio::test]
    async fn test_list_slices_pages() {
        let repo = MemoryRepo::with_documents(
            ["i1", "i2", "i3", "i4"]
                .into_iter()
                .map(|id| ("items", id, doc(json!({"name": id})))),
        );

        let page = repo.list("items", 1, 2).await.unwrap();
        let names: Vec<_> = page.result.iter().map(|d| d["name"].clone()).collect();
        assert_eq!(names, vec![json!("i3"), json!("i4")]);
        assert_eq!(page.total_count, 4);

        let empty = repo.list("items", 2, 2).await.unwrap();
        assert!(empty.result.is_empty());
        assert_eq!(empty.total_count, 4);
    }

    #[tokio::test]
    async fn test_replace_missing_is_noop() {
        let repo = MemoryRepo::new();
        repo.replace("users", "ghost", doc(json!({"x": 1}))).await.unwrap();
        assert!(repo.get("users", "ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_from_listing() {
        let repo = MemoryRepo::new();
        repo.create("users", doc(json!({})), Some("a")).await.unwrap();
        repo.create("users", doc(json!({})), Some("b")).await.unwrap();

        repo.delete("users", "a").await.unwrap();
        repo.delete("users", "missing").await.unwrap();

        let page = repo.list("users", 0, 30).await.unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.result[0]["id"], "b");
    }

    #[tokio::test]
    async fn test_slugs_are_isolated() {
        let repo = MemoryRepo::new();
        repo.create("users", doc(json!({})), Some("1")).await.unwrap();
        assert!(repo.get("orders", "1").await.unwrap().is_none());
        assert_eq!(repo.list("orders", 0, 30).await.unwrap().total_count, 0);
    }
}
