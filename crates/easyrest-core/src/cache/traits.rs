//! Cache trait definition.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheError;

/// Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// String key → serialized value cache with optional expiry.
///
/// A miss is `Ok(None)`, never an error. A `ttl` of `None` or zero stores the
/// value without expiry.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()>;

    async fn delete(&self, key: &str) -> CacheResult<()>;
}
