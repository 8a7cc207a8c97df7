//! Application state for the web layer.

use std::sync::Arc;

use crate::assets::{OfflineAssets, OriginFetcher};
use crate::domain::Timetable;
use crate::storage::KeyValueStore;

/// Shared application state.
///
/// Owns everything the handlers read: the immutable timetable, the user
/// state store, and the asset cache.
#[derive(Clone)]
pub struct AppState {
    /// Timetable loaded at startup
    pub timetable: Arc<Timetable>,

    /// Favorites and recent searches
    pub store: Arc<dyn KeyValueStore>,

    /// Offline asset cache
    pub assets: Arc<OfflineAssets<OriginFetcher>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        timetable: Timetable,
        store: Arc<dyn KeyValueStore>,
        assets: OfflineAssets<OriginFetcher>,
    ) -> Self {
        Self {
            timetable: Arc::new(timetable),
            store,
            assets: Arc::new(assets),
        }
    }
}
