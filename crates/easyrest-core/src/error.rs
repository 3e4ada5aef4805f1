//! Error types for easyrest core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps them
//! to user-facing messages and exit codes.

use thiserror::Error;

use crate::schema::Handler;

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Message shown to users when a collaborator failure carries no safe message.
pub const GENERIC_USER_MESSAGE: &str = "Internal error, please try again later";

/// Failure reported by a [`Repo`](crate::storage::Repo) implementation.
///
/// `message` is technical and meant for logs. `user_message`, when present,
/// is safe to show to whoever issued the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Store error: {message}")]
pub struct StoreError {
    pub message: String,
    pub user_message: Option<String>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_message: None,
        }
    }

    pub fn with_user_message(mut self, user_message: impl Into<String>) -> Self {
        self.user_message = Some(user_message.into());
        self
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::new(format!("SQLite: {}", err))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::new(format!("Stored document is not valid JSON: {}", err))
    }
}

/// Failure reported by a [`Cache`](crate::cache::Cache) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cache error: {message}")]
pub struct CacheError {
    pub message: String,
    pub user_message: Option<String>,
}

impl CacheError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_message: None,
        }
    }

    pub fn with_user_message(mut self, user_message: impl Into<String>) -> Self {
        self.user_message = Some(user_message.into());
        self
    }
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::new(err.to_string())
    }
}

/// How a consuming layer should classify a [`ServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Nothing to act on (404-equivalent).
    NotFound,
    /// The caller sent something invalid (400-equivalent).
    InvalidInput,
    /// The service or one of its collaborators failed (500-equivalent).
    Internal,
}

impl ErrorClass {
    /// HTTP-style status code for this class.
    pub fn status(self) -> u16 {
        match self {
            ErrorClass::NotFound => 404,
            ErrorClass::InvalidInput => 400,
            ErrorClass::Internal => 500,
        }
    }
}

/// Core error type for entity service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No document with this id under the slug
    #[error("{slug} {id} not found")]
    NotFound { slug: String, id: String },

    /// Document failed schema validation; carries every violation in order
    #[error("Input not valid: {}", .0.join("; "))]
    InputNotValid(Vec<String>),

    /// Store collaborator failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Cache collaborator failure
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Slug is not registered
    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    /// Slug is registered but the operation is not enabled for it
    #[error("Operation {handler} is not enabled for {slug}")]
    HandlerDisabled { slug: String, handler: Handler },

    /// Anything else
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ServiceError {
    pub fn not_found(slug: &str, id: &str) -> Self {
        ServiceError::NotFound {
            slug: slug.to_string(),
            id: id.to_string(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            ServiceError::NotFound { .. }
            | ServiceError::UnknownSchema(_)
            | ServiceError::HandlerDisabled { .. } => ErrorClass::NotFound,
            ServiceError::InputNotValid(_) => ErrorClass::InvalidInput,
            ServiceError::Store(_) | ServiceError::Cache(_) | ServiceError::Unexpected(_) => {
                ErrorClass::Internal
            }
        }
    }

    /// HTTP-style status code for this error.
    pub fn status(&self) -> u16 {
        self.class().status()
    }

    /// Message that is safe to surface to the caller.
    ///
    /// Collaborator failures only expose their `user_message`; unexpected
    /// errors never expose any detail.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Store(err) => err
                .user_message
                .clone()
                .unwrap_or_else(|| GENERIC_USER_MESSAGE.to_string()),
            ServiceError::Cache(err) => err
                .user_message
                .clone()
                .unwrap_or_else(|| GENERIC_USER_MESSAGE.to_string()),
            ServiceError::Unexpected(_) => GENERIC_USER_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Validation messages, if this is an `InputNotValid` error.
    pub fn violations(&self) -> Option<&[String]> {
        match self {
            ServiceError::InputNotValid(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Unexpected(err.to_string())
    }
}

/// Configuration error raised while building a [`SchemaRegistry`](crate::schema::SchemaRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Duplicate schema slug: {0}")]
    DuplicateSlug(String),

    #[error("Schema {name:?} has an empty slug")]
    EmptySlug { name: String },
}

/// Error raised while reading a schema declaration.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Invalid schema declaration: {0}")]
    Declaration(#[from] serde_json::Error),

    #[error("Schema {slug}: {message}")]
    Invalid { slug: String, message: String },

    #[error("Schema {slug} does not compile: {message}")]
    Compile { slug: String, message: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
