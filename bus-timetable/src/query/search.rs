//! Finding the routes between two locations.

use crate::domain::{Location, Route, Timetable};

/// Error returned when a search is missing one of its endpoints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select both \"From\" and \"To\" locations")]
    MissingSelection,
}

/// A validated (from, to) search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub from: Location,
    pub to: Location,
}

impl SearchQuery {
    /// Build a query from the raw selections.
    ///
    /// An absent or empty selection counts as missing.
    pub fn new(from: Option<&str>, to: Option<&str>) -> Result<Self, ValidationError> {
        match (non_empty(from), non_empty(to)) {
            (Some(from), Some(to)) => Ok(Self {
                from: from.to_string(),
                to: to.to_string(),
            }),
            _ => Err(ValidationError::MissingSelection),
        }
    }

    /// Run the query against a timetable.
    pub fn run<'a>(&self, timetable: &'a Timetable) -> Vec<&'a Route> {
        find_matching_routes(timetable, &self.from, &self.to)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// All routes running from `from` to `to`, in timetable order.
///
/// Locations are compared with exact string equality.
pub fn find_matching_routes<'a>(timetable: &'a Timetable, from: &str, to: &str) -> Vec<&'a Route> {
    timetable
        .routes()
        .iter()
        .filter(|r| r.from == from && r.to == to)
        .collect()
}
