#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use easyrest_core::cache::CacheResult;
use easyrest_core::storage::StoreResult;
use easyrest_core::{
    ApiDeclaration, Cache, CacheError, Document, EntityService, MemoryCache, MemoryRepo,
    PageResult, Repo, SchemaRegistry, StoreError,
};

pub fn registry() -> SchemaRegistry {
    ApiDeclaration::from_json_str(
        &json!({
            "name": "ProjectName",
            "schemas": [
                {
                    "name": "Mock",
                    "slug": "mock",
                    "properties": {
                        "name": {"type": "string"},
                        "age": {"type": "integer"},
                        "address": {
                            "type": "object",
                            "properties": {"city": {"type": "string"}}
                        }
                    },
                    "required": ["name"]
                },
                {
                    "name": "Strict",
                    "slug": "strict",
                    "properties": {"name": {"type": "string"}},
                    "additionalProperties": false
                },
                {
                    "name": "Coupon",
                    "slug": "coupons",
                    "definitions": {"amount": {"type": "integer", "minimum": 1}},
                    "properties": {
                        "code": {"type": "string", "pattern": "^[A-Z0-9]+$"},
                        "value": {"$ref": "#/definitions/amount"},
                        "target": {"anyOf": [{"type": "string"}, {"type": "null"}]}
                    },
                    "required": ["code"]
                },
                {
                    "name": "Second api",
                    "slug": "second",
                    "properties": {"name": {"type": "string"}},
                    "enabled_handlers": ["get"]
                }
            ]
        })
        .to_string(),
    )
    .expect("declarations parse")
    .into_registry()
    .expect("registry builds")
}

pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {}", other),
    }
}

/// Per-operation call counters.
#[derive(Debug, Default)]
pub struct Calls {
    pub get: AtomicUsize,
    pub list: AtomicUsize,
    pub create: AtomicUsize,
    pub replace: AtomicUsize,
    pub delete: AtomicUsize,
    pub set: AtomicUsize,
}

impl Calls {
    pub fn get(&self) -> usize {
        self.get.load(Ordering::SeqCst)
    }

    pub fn list(&self) -> usize {
        self.list.load(Ordering::SeqCst)
    }

    pub fn set(&self) -> usize {
        self.set.load(Ordering::SeqCst)
    }

    pub fn delete(&self) -> usize {
        self.delete.load(Ordering::SeqCst)
    }

    /// Store calls that modify data.
    pub fn writes(&self) -> usize {
        self.create.load(Ordering::SeqCst)
            + self.replace.load(Ordering::SeqCst)
            + self.delete.load(Ordering::SeqCst)
    }
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

/// `MemoryRepo` that counts every call.
#[derive(Default)]
pub struct CountingRepo {
    pub inner: MemoryRepo,
    pub calls: Calls,
}

#[async_trait]
impl Repo for CountingRepo {
    async fn get(&self, slug: &str, id: &str) -> StoreResult<Option<Document>> {
        bump(&self.calls.get);
        self.inner.get(slug, id).await
    }

    async fn list(&self, slug: &str, page: u64, size: u64) -> StoreResult<PageResult> {
        bump(&self.calls.list);
        self.inner.list(slug, page, size).await
    }

    async fn create(&self, slug: &str, data: Document, id: Option<&str>) -> StoreResult<String> {
        bump(&self.calls.create);
        self.inner.create(slug, data, id).await
    }

    async fn replace(&self, slug: &str, id: &str, data: Document) -> StoreResult<()> {
        bump(&self.calls.replace);
        self.inner.replace(slug, id, data).await
    }

    async fn delete(&self, slug: &str, id: &str) -> StoreResult<()> {
        bump(&self.calls.delete);
        self.inner.delete(slug, id).await
    }
}

/// `MemoryCache` that counts every call.
#[derive(Default)]
pub struct CountingCache {
    pub inner: MemoryCache,
    pub calls: Calls,
}

#[async_trait]
impl Cache for CountingCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        bump(&self.calls.get);
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()> {
        bump(&self.calls.set);
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        bump(&self.calls.delete);
        self.inner.delete(key).await
    }
}

/// Store whose every call fails.
pub struct BrokenRepo;

#[async_trait]
impl Repo for BrokenRepo {
    async fn get(&self, _slug: &str, _id: &str) -> StoreResult<Option<Document>> {
        Err(StoreError::new("connection refused"))
    }

    async fn list(&self, _slug: &str, _page: u64, _size: u64) -> StoreResult<PageResult> {
        Err(StoreError::new("connection refused"))
    }

    async fn create(&self, _slug: &str, _data: Document, _id: Option<&str>) -> StoreResult<String> {
        Err(StoreError::new("duplicate key").with_user_message("Document already exists"))
    }

    async fn replace(&self, _slug: &str, _id: &str, _data: Document) -> StoreResult<()> {
        Err(StoreError::new("connection refused"))
    }

    async fn delete(&self, _slug: &str, _id: &str) -> StoreResult<()> {
        Err(StoreError::new("connection refused"))
    }
}

/// Cache whose every call fails.
pub struct BrokenCache;

#[async_trait]
impl Cache for BrokenCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::new("cache unreachable"))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Option<Duration>) -> CacheResult<()> {
        Err(CacheError::new("cache unreachable"))
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Err(CacheError::new("cache unreachable"))
    }
}

pub struct Harness {
    pub service: EntityService,
    pub repo: Arc<CountingRepo>,
    pub cache: Arc<CountingCache>,
}

pub fn harness() -> Harness {
    let repo = Arc::new(CountingRepo::default());
    let cache = Arc::new(CountingCache::default());
    let service = EntityService::new(registry(), repo.clone(), cache.clone());
    Harness {
        service,
        repo,
        cache,
    }
}
