//! Entity service: schema-scoped CRUD over a store and a cache.
//!
//! Reads go through the cache first (cache-aside). Writes validate against
//! the schema, go to the store, then delete the affected `get` cache entry.
//! Listings are cached under their own, shorter TTL and are only invalidated
//! by expiry unless [`ServiceOptions::eager_list_invalidation`] is set.
//!
//! Eager invalidation keys every cached page by a per-slug generation token
//! kept in the cache itself. A write stores a fresh token, which orphans the
//! pages cached under the old one for every service sharing that cache.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::cache::keys::{generation_key, get_key, list_key, list_key_in_generation};
use crate::cache::Cache;
use crate::error::{CacheError, Result, ServiceError, StoreError};
use crate::merge::merge;
use crate::schema::{Handler, Schema, SchemaRegistry};
use crate::storage::{Document, PageRequest, PageResult, Repo, DEFAULT_PAGE_SIZE};
use crate::validation::validate;

/// Default TTL for cached single-document reads.
pub const DEFAULT_GET_TTL: Duration = Duration::from_secs(30 * 60);

/// Default TTL for cached listings.
pub const DEFAULT_LIST_TTL: Duration = Duration::from_secs(10);

/// Tunables for [`EntityService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOptions {
    /// TTL for `get` cache entries
    pub get_ttl: Duration,

    /// TTL for `list` cache entries
    pub list_ttl: Duration,

    /// Page size used when a listing does not specify one
    pub default_page_size: u64,

    /// Drop every cached page of a slug on each write to it
    pub eager_list_invalidation: bool,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            get_ttl: DEFAULT_GET_TTL,
            list_ttl: DEFAULT_LIST_TTL,
            default_page_size: DEFAULT_PAGE_SIZE,
            eager_list_invalidation: false,
        }
    }
}

/// The public entity API.
///
/// Collaborators are passed in explicitly; the service owns no store or
/// cache of its own and is safe to share behind an `Arc`.
pub struct EntityService {
    registry: SchemaRegistry,
    repo: Arc<dyn Repo>,
    cache: Arc<dyn Cache>,
    options: ServiceOptions,
}

impl EntityService {
    pub fn new(registry: SchemaRegistry, repo: Arc<dyn Repo>, cache: Arc<dyn Cache>) -> Self {
        Self {
            registry,
            repo,
            cache,
            options: ServiceOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ServiceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Every declared schema, in declaration order.
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.registry.schemas()
    }

    /// Declared schema for `slug`.
    pub fn schema(&self, slug: &str) -> Result<&Schema> {
        self.registry
            .get(slug)
            .ok_or_else(|| ServiceError::UnknownSchema(slug.to_string()))
    }

    /// List one page of documents.
    ///
    /// `page` defaults to 0 and `size` to the configured page size.
    pub async fn list(
        &self,
        slug: &str,
        page: Option<u64>,
        size: Option<u64>,
    ) -> Result<PageResult> {
        self.registry.resolve(slug, Handler::List)?;
        let request =
            PageRequest::with_default_size(page, size, self.options.default_page_size);
        let key = self.page_key(slug, &request).await?;

        if let Some(cached) = self.cached::<PageResult>(&key).await? {
            return Ok(cached);
        }

        let mut result = self
            .repo
            .list(slug, request.page, request.size)
            .await
            .map_err(|err| store_failed(slug, "list", err))?;
        let limit = usize::try_from(request.size).unwrap_or(usize::MAX);
        if result.result.len() > limit {
            warn!(
                slug,
                returned = result.result.len(),
                size = request.size,
                "store returned an oversized page"
            );
            result.result.truncate(limit);
        }

        self.populate(&key, &result, self.options.list_ttl).await?;
        Ok(result)
    }

    /// Get one document by id.
    pub async fn get(&self, slug: &str, id: &str) -> Result<Document> {
        self.registry.resolve(slug, Handler::Get)?;
        let key = get_key(slug, id);

        if let Some(cached) = self.cached::<Document>(&key).await? {
            return Ok(cached);
        }

        match self
            .repo
            .get(slug, id)
            .await
            .map_err(|err| store_failed(slug, "get", err))?
        {
            Some(document) => {
                self.populate(&key, &document, self.options.get_ttl).await?;
                Ok(document)
            }
            None => Err(ServiceError::not_found(slug, id)),
        }
    }

    /// Validate and store a new document, returning its effective id.
    pub async fn create(&self, slug: &str, data: Document, id: Option<&str>) -> Result<String> {
        let schema = self.registry.resolve(slug, Handler::Create)?;
        check(schema, &data)?;

        let id = self
            .repo
            .create(slug, data, id)
            .await
            .map_err(|err| store_failed(slug, "create", err))?;
        info!(slug, id = %id, "created document");

        self.invalidate(slug, &id).await?;
        Ok(id)
    }

    /// Replace an existing document wholesale.
    pub async fn replace(&self, slug: &str, data: Document, id: &str) -> Result<()> {
        let schema = self.registry.resolve(slug, Handler::Replace)?;
        self.require_existing(slug, id).await?;
        check(schema, &data)?;

        self.repo
            .replace(slug, id, data)
            .await
            .map_err(|err| store_failed(slug, "replace", err))?;
        info!(slug, id, "replaced document");

        self.invalidate(slug, id).await
    }

    /// Merge `data` onto an existing document and store the result.
    ///
    /// The merged document, not the patch, is validated.
    pub async fn partial_update(&self, slug: &str, data: Document, id: &str) -> Result<()> {
        let schema = self.registry.resolve(slug, Handler::PartialUpdate)?;
        let existing = self.require_existing(slug, id).await?;

        let mut merged = merge(&data, &existing);
        merged.remove(self.repo.id_field());
        check(schema, &merged)?;

        self.repo
            .replace(slug, id, merged)
            .await
            .map_err(|err| store_failed(slug, "partial_update", err))?;
        info!(slug, id, "updated document");

        self.invalidate(slug, id).await
    }

    /// Delete an existing document.
    pub async fn delete(&self, slug: &str, id: &str) -> Result<()> {
        self.registry.resolve(slug, Handler::Delete)?;
        self.require_existing(slug, id).await?;

        self.repo
            .delete(slug, id)
            .await
            .map_err(|err| store_failed(slug, "delete", err))?;
        info!(slug, id, "deleted document");

        self.invalidate(slug, id).await
    }

    /// Authoritative existence check; always reads the store, never the cache.
    async fn require_existing(&self, slug: &str, id: &str) -> Result<Document> {
        self.repo
            .get(slug, id)
            .await
            .map_err(|err| store_failed(slug, "get", err))?
            .ok_or_else(|| ServiceError::not_found(slug, id))
    }

    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw = self.cache.get(key).await.map_err(|err| cache_failed(key, err))?;
        let Some(raw) = raw else {
            debug!(key, "cache miss");
            return Ok(None);
        };
        debug!(key, "cache hit");
        serde_json::from_str(&raw).map(Some).map_err(|err| {
            cache_failed(key, CacheError::new(format!("Corrupt cache entry: {}", err)))
        })
    }

    async fn populate<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.cache
            .set(key, raw, Some(ttl))
            .await
            .map_err(|err| cache_failed(key, err))
    }

    async fn invalidate(&self, slug: &str, id: &str) -> Result<()> {
        let key = get_key(slug, id);
        self.cache
            .delete(&key)
            .await
            .map_err(|err| cache_failed(&key, err))?;

        if self.options.eager_list_invalidation {
            let key = generation_key(slug);
            let token = Uuid::now_v7().simple().to_string();
            self.cache
                .set(&key, token, Some(self.generation_ttl()))
                .await
                .map_err(|err| cache_failed(&key, err))?;
            debug!(slug, "list generation advanced");
        }
        Ok(())
    }

    /// Cache key for one page, scoped to the slug's current generation when
    /// eager invalidation is on.
    async fn page_key(&self, slug: &str, request: &PageRequest) -> Result<String> {
        if !self.options.eager_list_invalidation {
            return Ok(list_key(slug, request));
        }
        let key = generation_key(slug);
        let token = self
            .cache
            .get(&key)
            .await
            .map_err(|err| cache_failed(&key, err))?;
        Ok(list_key_in_generation(
            slug,
            token.as_deref().unwrap_or("0"),
            request,
        ))
    }

    /// A generation must outlive every page cached under it.
    fn generation_ttl(&self) -> Duration {
        let list_ttl = self.options.list_ttl;
        if list_ttl.is_zero() {
            return list_ttl;
        }
        list_ttl.max(self.options.get_ttl)
    }
}

fn check(schema: &Schema, data: &Document) -> Result<()> {
    let errors = validate(&Value::Object(data.clone()), schema);
    if errors.is_empty() {
        return Ok(());
    }
    debug!(slug = schema.slug(), violations = errors.len(), "document rejected");
    Err(ServiceError::InputNotValid(errors))
}

fn store_failed(slug: &str, operation: &str, err: StoreError) -> ServiceError {
    error!(slug, operation, error = %err.message, "store operation failed");
    ServiceError::Store(err)
}

fn cache_failed(key: &str, err: CacheError) -> ServiceError {
    error!(key, error = %err.message, "cache operation failed");
    ServiceError::Cache(err)
}
