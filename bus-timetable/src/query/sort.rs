//! Ordering a result set.

use std::str::FromStr;

use crate::domain::Route;

/// The orderings offered for a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// First departure of the day, earliest first
    Time,
    /// Duration of the first trip, shortest first
    Duration,
    /// Bus type, alphabetically
    Type,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Duration => "duration",
            Self::Type => "type",
        }
    }
}

/// A sort key name that isn't one of `time`, `duration` or `type`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key: {0:?}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "time" => Ok(Self::Time),
            "duration" => Ok(Self::Duration),
            "type" => Ok(Self::Type),
            _ => Err(UnknownSortKey(s.to_string())),
        }
    }
}

/// Stable-sort `results` by the named key.
///
/// Unrecognised keys leave the order untouched.
pub fn sort_results<'a>(mut results: Vec<&'a Route>, key: &str) -> Vec<&'a Route> {
    let Ok(key) = key.parse::<SortKey>() else {
        return results;
    };

    match key {
        SortKey::Time => results.sort_by_key(|r| r.first_trip().departure),
        SortKey::Duration => results.sort_by_key(|r| r.first_trip().duration()),
        SortKey::Type => results.sort_by(|a, b| a.kind.cmp(&b.kind)),
    }

    results
}
