//! Offline asset cache.
//!
//! Static assets are pre-fetched into a cache named after the deploy's
//! version tag when the server starts, then served cache-first. Caches
//! from earlier versions are kept and still answer lookups.

mod cache;
mod error;
mod fetch;

pub use cache::{AssetCache, CacheConfig, CacheStorage, DEFAULT_CACHE_NAME, OfflineAssets};
pub use error::AssetError;
pub use fetch::{Asset, AssetFetcher, OriginFetcher, content_type_for};

/// Assets fetched into the cache on install.
pub const PRECACHE_URLS: &[&str] = &[
    "/static/main.css",
    "/static/data.json",
    "https://fonts.googleapis.com/css2?family=Poppins:wght@300;400;500;600&display=swap",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0-beta3/css/all.min.css",
];
