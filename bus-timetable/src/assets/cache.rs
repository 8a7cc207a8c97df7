//! Versioned asset caches.

use std::sync::{Mutex, PoisonError};

use futures::future::join_all;
use moka::future::Cache as MokaCache;
use tracing::{debug, info};

use super::error::AssetError;
use super::fetch::{Asset, AssetFetcher};

/// Cache name used when no version tag is configured.
pub const DEFAULT_CACHE_NAME: &str = "bus-timing-v1";

/// Configuration for the asset cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Name of the cache filled on install. Bump it to re-fetch on deploy.
    pub version: String,

    /// Maximum number of entries per named cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_CACHE_NAME.to_string(),
            max_capacity: 256,
        }
    }
}

/// A single named cache of assets, keyed by request URL.
#[derive(Clone)]
pub struct AssetCache {
    name: String,
    entries: MokaCache<String, Asset>,
}

impl AssetCache {
    fn new(name: &str, max_capacity: u64) -> Self {
        Self {
            name: name.to_string(),
            entries: MokaCache::builder().max_capacity(max_capacity).build(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn get(&self, url: &str) -> Option<Asset> {
        self.entries.get(url).await
    }

    pub async fn insert(&self, url: &str, asset: Asset) {
        self.entries.insert(url.to_string(), asset).await;
    }
}

/// All named caches, in the order they were first opened.
///
/// Opening a name twice returns the same cache. Nothing is ever deleted,
/// so caches from previous versions accumulate.
pub struct CacheStorage {
    caches: Mutex<Vec<AssetCache>>,
    max_capacity: u64,
}

impl CacheStorage {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            caches: Mutex::new(Vec::new()),
            max_capacity,
        }
    }

    /// Get the cache called `name`, creating it if needed.
    pub fn open(&self, name: &str) -> AssetCache {
        let mut caches = self.caches.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cache) = caches.iter().find(|c| c.name == name) {
            return cache.clone();
        }

        let cache = AssetCache::new(name, self.max_capacity);
        caches.push(cache.clone());
        cache
    }

    /// Names of all caches.
    pub fn names(&self) -> Vec<String> {
        self.caches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    /// Look `url` up in every cache, oldest first.
    pub async fn match_url(&self, url: &str) -> Option<Asset> {
        let caches = self
            .caches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for cache in caches {
            if let Some(asset) = cache.get(url).await {
                return Some(asset);
            }
        }
        None
    }
}

/// Cache-first asset serving backed by an origin fetcher.
pub struct OfflineAssets<F> {
    storage: CacheStorage,
    fetcher: F,
    version: String,
}

impl<F: AssetFetcher> OfflineAssets<F> {
    pub fn new(fetcher: F, config: &CacheConfig) -> Self {
        Self {
            storage: CacheStorage::new(config.max_capacity),
            fetcher,
            version: config.version.clone(),
        }
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// Name of the cache filled by [`install`](Self::install).
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Fetch every URL and store them in the current version's cache.
    ///
    /// All or nothing: if any fetch fails, or the cache is too small to
    /// keep every asset, nothing is stored and an error is returned.
    pub async fn install(&self, urls: &[&str]) -> Result<usize, AssetError> {
        let capacity = self.storage.max_capacity;
        if urls.len() as u64 > capacity {
            return Err(AssetError::CapacityExceeded {
                needed: urls.len(),
                capacity,
            });
        }

        let fetched = join_all(urls.iter().map(|url| self.fetcher.fetch(url))).await;
        let assets = fetched.into_iter().collect::<Result<Vec<_>, _>>()?;

        let cache = self.storage.open(&self.version);
        for (url, asset) in urls.iter().zip(assets) {
            cache.insert(url, asset).await;
        }

        info!(cache = %self.version, count = urls.len(), "installed offline assets");
        Ok(urls.len())
    }

    /// Serve `url` from any cache, falling back to the origin.
    ///
    /// Origin responses are not added to the cache.
    pub async fn respond(&self, url: &str) -> Result<Asset, AssetError> {
        if let Some(asset) = self.storage.match_url(url).await {
            debug!(url, "asset cache hit");
            return Ok(asset);
        }

        debug!(url, "asset cache miss");
        self.fetcher.fetch(url).await
    }
}
