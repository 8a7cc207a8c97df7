//! Narrowing a result set by route name.

use crate::domain::Route;

/// Keep the routes whose name contains `term`, ignoring case.
///
/// An empty term keeps everything.
pub fn filter_results<'a>(results: Vec<&'a Route>, term: &str) -> Vec<&'a Route> {
    if term.is_empty() {
        return results;
    }

    let needle = term.to_lowercase();
    results
        .into_iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .collect()
}
