//! Favorite routes.
//!
//! Each route's flag is stored under its own key as the string `"true"` or
//! `"false"`, so flags for routes that have since left the timetable are
//! harmless until pruned.

use tracing::info;

use super::{KeyValueStore, StoreError};
use crate::domain::{RouteId, Timetable};

/// Prefix of every favorite key.
pub const FAVORITE_KEY_PREFIX: &str = "fav_";

/// Store key for a route's favorite flag.
pub fn favorite_key(route_id: &RouteId) -> String {
    format!("{FAVORITE_KEY_PREFIX}{route_id}")
}

/// Whether the route is marked as a favorite. Absent means no.
pub fn is_favorite(store: &dyn KeyValueStore, route_id: &RouteId) -> bool {
    store.get(&favorite_key(route_id)).as_deref() == Some("true")
}

/// Flip a route's favorite flag and return the new state.
pub fn toggle_favorite(store: &dyn KeyValueStore, route_id: &RouteId) -> Result<bool, StoreError> {
    let mut favorite = false;
    store.update(&favorite_key(route_id), &mut |current| {
        favorite = current != Some("true");
        Ok(favorite.to_string())
    })?;
    Ok(favorite)
}

/// Remove favorite flags for routes the timetable no longer contains.
///
/// Returns how many flags were removed.
pub fn prune_stale_favorites(
    store: &dyn KeyValueStore,
    timetable: &Timetable,
) -> Result<usize, StoreError> {
    let stale: Vec<String> = store
        .keys()
        .into_iter()
        .filter(|key| {
            key.strip_prefix(FAVORITE_KEY_PREFIX)
                .is_some_and(|id| !timetable.contains_route(&RouteId::new(id)))
        })
        .collect();

    for key in &stale {
        store.remove(key)?;
    }

    if !stale.is_empty() {
        info!(count = stale.len(), "pruned stale favorites");
    }

    Ok(stale.len())
}
