//! Storage abstraction layer.
//!
//! This module defines the `Repo` trait and the bundled document stores.

pub mod memory;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use memory::MemoryRepo;
pub use sqlite::SqliteRepo;
pub use traits::{Repo, StoreResult};
pub use types::{Document, PageRequest, PageResult, DEFAULT_ID_FIELD, DEFAULT_PAGE_SIZE};
