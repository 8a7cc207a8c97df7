//! Recently searched (from, to) pairs.

use serde::{Deserialize, Serialize};

use super::{KeyValueStore, StoreError};
use crate::domain::Location;

/// Store key holding the JSON-encoded recent search list.
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";

/// How many recent searches are kept.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// A remembered search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSearch {
    pub from: Location,
    pub to: Location,
}

impl RecentSearch {
    pub fn new(from: impl Into<Location>, to: impl Into<Location>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// The persisted recent searches, most recent first.
///
/// An absent or malformed entry reads as an empty list.
pub fn load_recent_searches(store: &dyn KeyValueStore) -> Vec<RecentSearch> {
    decode(store.get(RECENT_SEARCHES_KEY).as_deref())
}

fn decode(json: Option<&str>) -> Vec<RecentSearch> {
    json.and_then(|json| serde_json::from_str(json).ok())
        .unwrap_or_default()
}

/// Remember a search, moving it to the front if it was already present.
///
/// Returns the updated list.
pub fn record_recent_search(
    store: &dyn KeyValueStore,
    from: &str,
    to: &str,
) -> Result<Vec<RecentSearch>, StoreError> {
    let mut searches = Vec::new();
    store.update(RECENT_SEARCHES_KEY, &mut |current| {
        searches = decode(current);
        searches.retain(|s| !(s.from == from && s.to == to));
        searches.insert(0, RecentSearch::new(from, to));
        searches.truncate(MAX_RECENT_SEARCHES);
        Ok(serde_json::to_string(&searches)?)
    })?;

    Ok(searches)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::storage::MemoryStore;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn arb_pair() -> impl Strategy<Value = (String, String)> {
        let loc = prop::sample::select(vec!["A", "B", "C", "D"]).prop_map(str::to_string);
        (loc.clone(), loc)
    }

    proptest! {
        /// After any sequence of insertions the list is short, unique, and led by the last search.
        #[test]
        fn bounded_unique_most_recent_first(pairs in prop::collection::vec(arb_pair(), 1..30)) {
            let store = MemoryStore::new();
            for (from, to) in &pairs {
                record_recent_search(&store, from, to).unwrap();
            }

            let searches = load_recent_searches(&store);
            prop_assert!(searches.len() <= MAX_RECENT_SEARCHES);

            let unique: HashSet<_> = searches.iter().map(|s| (&s.from, &s.to)).collect();
            prop_assert_eq!(unique.len(), searches.len());

            let (last_from, last_to) = pairs.last().unwrap();
            prop_assert_eq!(&searches[0], &RecentSearch::new(last_from.clone(), last_to.clone()));
        }
    }
}
