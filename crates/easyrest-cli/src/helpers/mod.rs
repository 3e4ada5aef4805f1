//! Shared helpers for command handlers.

mod input;

pub use input::read_document;
