//! Domain types for the bus timetable.
//!
//! This module contains the validated timetable model. Routes enforce their
//! invariants at construction time, so the query layer can index trips
//! without re-checking them.

mod error;
mod route;
mod time;
mod timetable;

pub use error::DomainError;
pub use route::{Location, Route, RouteId, RouteParts, Trip};
pub use time::{ClockTime, MINUTES_PER_DAY, TimeError, TripDuration, compute_duration};
pub use timetable::Timetable;
