//! Route queries over the loaded timetable.
//!
//! Everything here is a pure transform: the timetable is passed in
//! explicitly and nothing is persisted. Recording a search as recent is the
//! caller's job (see [`crate::storage`]).

mod filter;
mod search;
mod sort;

pub use filter::filter_results;
pub use search::{SearchQuery, ValidationError, find_matching_routes};
pub use sort::{SortKey, UnknownSortKey, sort_results};
