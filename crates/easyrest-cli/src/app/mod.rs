//! Application-level utilities for the easyrest CLI.
//!
//! This module provides:
//! - Path resolution for config, schema declarations, and the store
//! - The lazily-built entity service shared by command handlers

mod context;
mod resolver;

// Re-export public API
pub use context::AppContext;
