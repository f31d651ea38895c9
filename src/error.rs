//! Error types for the schema registry and the fetcher seam

use thiserror::Error;

/// Result type for registry and schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema registry errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Invalid schema for collection {collection}: {message}")]
    InvalidSchema { collection: String, message: String },

    #[error("Missing built-in schema for collection {0}")]
    MissingBuiltin(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure raised by a [`DocumentFetcher`](crate::fetcher::DocumentFetcher).
///
/// The validator never propagates these; the `Display` text becomes the
/// `fetchError` of the synthetic result.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{0}")]
    Unavailable(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
