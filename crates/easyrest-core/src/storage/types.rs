//! Core data types for the storage layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An entity document: field name → JSON value.
pub type Document = Map<String, Value>;

/// Field bundled stores use to carry a document's identity.
pub const DEFAULT_ID_FIELD: &str = "id";

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u64 = 30;

/// One page of documents from a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Documents on this page, in store order
    pub result: Vec<Document>,

    /// Zero-based page index
    pub page: u64,

    /// Requested page size
    pub size: u64,

    /// Documents under the slug at listing time
    #[serde(rename = "totalCount")]
    pub total_count: u64,
}

/// Normalized pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    /// Fill in defaults: page 0, size [`DEFAULT_PAGE_SIZE`]. A zero size is
    /// treated as absent.
    pub fn new(page: Option<u64>, size: Option<u64>) -> Self {
        Self::with_default_size(page, size, DEFAULT_PAGE_SIZE)
    }

    pub fn with_default_size(page: Option<u64>, size: Option<u64>, default_size: u64) -> Self {
        let size = match size {
            Some(0) | None => default_size.max(1),
            Some(size) => size,
        };
        Self {
            page: page.unwrap_or(0),
            size,
        }
    }

    /// Index of the first document on this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Copy of `data` carrying `id` under `id_field`.
pub fn with_identity(mut data: Document, id_field: &str, id: &str) -> Document {
    data.insert(id_field.to_string(), Value::String(id.to_string()));
    data
}
