//! Data source error types.

use std::path::PathBuf;

/// Errors that can occur while loading the timetable data source.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// Local file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("data source returned status {status}")]
    Status { status: u16 },

    /// Body was not a valid timetable document
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
