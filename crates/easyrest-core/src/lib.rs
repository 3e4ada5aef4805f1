//! # easyrest core
//!
//! Core library for easyrest - a schema-driven entity service.
//!
//! Given a set of declared entity types, this crate exposes uniform
//! list/get/create/replace/partial-update/delete operations over a pluggable
//! document store and a pluggable cache, independent of any transport.
//!
//! ## Architecture
//!
//! - **schema**: Schema declarations and the slug registry
//! - **validation**: Draft 7 JSON Schema document validation
//! - **merge**: Recursive merge used by partial updates
//! - **storage**: `Repo` trait plus memory and SQLite document stores
//! - **cache**: `Cache` trait, key scheme, and in-process caches
//! - **service**: `EntityService`, the cache-aside orchestration layer

pub mod cache;
pub mod error;
pub mod merge;
pub mod schema;
pub mod service;
pub mod storage;
pub mod validation;

pub use cache::{Cache, MemoryCache, NoCache};
pub use error::{CacheError, ErrorClass, Result, ServiceError, StoreError};
pub use schema::{ApiDeclaration, Handler, Schema, SchemaRegistry};
pub use service::{EntityService, ServiceOptions};
pub use storage::{Document, MemoryRepo, PageResult, Repo, SqliteRepo};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
