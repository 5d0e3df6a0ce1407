//! Error types for rental-cleaner operations.
//!
//! Defines error types for the two subsystems with fallible operations:
//! - The artifact store client and run context
//! - Tabular data parsing and transformation
//!
//! Every error is fatal: callers propagate with `?` up to `main`, which
//! exits non-zero with the error chain printed. There is no retry path.

use thiserror::Error;

/// Errors that can occur talking to the artifact store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing API base URL: TRACKER_API_BASE environment variable not set")]
    MissingApiBase,

    #[error("Missing API key: TRACKER_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("Artifact '{0}' not found in store")]
    ArtifactNotFound(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Store API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Artifact publish rejected ({status}): {message}")]
    PublishRejected { status: u16, message: String },

    #[error("Artifact '{0}' has no file attached")]
    NoFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur parsing or transforming tabular data.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Column '{0}' not found in table")]
    MissingColumn(String),

    #[error("Failed to parse delimited file: {0}")]
    Parse(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
