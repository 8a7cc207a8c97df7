//! Durable key-value storage for user state.
//!
//! Recent searches and favorites live behind the [`KeyValueStore`] port so
//! the query code never touches a concrete backend. Values are plain
//! strings, like browser local storage.

mod error;
mod favorites;
mod file;
mod memory;
mod recent;

pub use error::StoreError;
pub use favorites::{FAVORITE_KEY_PREFIX, favorite_key, is_favorite, prune_stale_favorites, toggle_favorite};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use recent::{
    MAX_RECENT_SEARCHES, RECENT_SEARCHES_KEY, RecentSearch, load_recent_searches,
    record_recent_search,
};

/// Synchronous string key-value storage.
///
/// Reads never fail: a backend that cannot produce a value reports it as
/// absent. Writes report failure so the caller can surface it.
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Replace the value under `key` with whatever `f` computes from the
    /// current one, holding the store's lock for the whole exchange.
    ///
    /// Nothing is written when `f` fails.
    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<&str>) -> Result<String, StoreError>,
    ) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// All keys currently stored, in no particular order.
    fn keys(&self) -> Vec<String>;
}
