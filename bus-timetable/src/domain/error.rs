//! Domain error types.
//!
//! These errors describe timetable entries that violate the route
//! invariants. They are distinct from I/O and parse errors of the data
//! source itself.

use super::route::RouteId;
use super::time::TimeError;

/// Domain-level errors for route validation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// Departures and arrivals are not index-aligned
    #[error("{departures} departures but {arrivals} arrivals")]
    MismatchedTrips { departures: usize, arrivals: usize },

    /// Route has no trips at all
    #[error("route has no trips")]
    NoTrips,

    /// A departure or arrival could not be parsed
    #[error(transparent)]
    InvalidTime(#[from] TimeError),

    /// Another route already uses this id
    #[error("duplicate route id {0}")]
    DuplicateId(RouteId),
}
