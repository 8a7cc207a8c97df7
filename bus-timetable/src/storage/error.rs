//! Storage error types.

use std::path::PathBuf;

/// Errors that can occur when writing to a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backing file could not be written
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Value could not be encoded
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}
