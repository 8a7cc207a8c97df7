//! Asset cache error types.

/// Errors that can occur when fetching an asset from its origin.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// No such asset at the origin
    #[error("asset not found: {url}")]
    NotFound { url: String },

    /// Local asset could not be read
    #[error("failed to read asset {url}: {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The cache cannot hold every asset being installed
    #[error("cannot install {needed} assets into a cache of capacity {capacity}")]
    CapacityExceeded { needed: usize, capacity: u64 },

    /// Remote origin returned an error status
    #[error("asset {url} returned status {status}")]
    Status { url: String, status: u16 },
}
