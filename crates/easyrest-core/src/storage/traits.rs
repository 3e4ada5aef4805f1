//! Document store trait definition.
//!
//! The `Repo` trait is the interface every persistent store must implement.
//! It lets the service run over an in-memory map, SQLite, or any external
//! document database without changing the core logic.

use async_trait::async_trait;

use super::types::{Document, PageResult, DEFAULT_ID_FIELD};
use crate::error::StoreError;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Slug-scoped document store.
///
/// All implementations must ensure:
/// - Documents keep their identity across `replace`
/// - `list` returns documents in a stable order and never more than `size`
/// - Every call is atomic from the caller's point of view
#[async_trait]
pub trait Repo: Send + Sync {
    /// Field under which this store writes a document's identity.
    ///
    /// The service strips it before validating a merged document.
    fn id_field(&self) -> &str {
        DEFAULT_ID_FIELD
    }

    /// Get a document by id.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(document))` if found, `Ok(None)` if not found.
    async fn get(&self, slug: &str, id: &str) -> StoreResult<Option<Document>>;

    /// List one page of documents. `page` and `size` are already normalized.
    async fn list(&self, slug: &str, page: u64, size: u64) -> StoreResult<PageResult>;

    /// Store a new document.
    ///
    /// # Returns
    ///
    /// Returns the effective id: `id` when given, otherwise one generated by
    /// the store. Creating with an id that already exists overwrites it.
    async fn create(&self, slug: &str, data: Document, id: Option<&str>) -> StoreResult<String>;

    /// Replace the document stored under `id`. Missing ids are left alone.
    async fn replace(&self, slug: &str, id: &str, data: Document) -> StoreResult<()>;

    /// Delete the document stored under `id`, if any.
    async fn delete(&self, slug: &str, id: &str) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_is_object_safe() {
        fn _accepts_repo(_repo: std::sync::Arc<dyn Repo>) {}
    }
}
