//! Cache abstraction layer.
//!
//! This module defines the `Cache` trait, the cache key scheme used by the
//! service, and the bundled in-process caches.

pub mod keys;
pub mod memory;
pub mod none;
pub mod traits;

pub use memory::MemoryCache;
pub use none::NoCache;
pub use traits::{Cache, CacheResult};
