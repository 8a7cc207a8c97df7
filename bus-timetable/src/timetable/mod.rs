//! Timetable data source loading.
//!
//! Reads the static JSON timetable from a file or URL at startup and
//! validates each route into the domain model.

mod error;
mod loader;

pub use error::DataLoadError;
pub use loader::{
    DEFAULT_TIMEOUT_SECS, RouteDto, TimetableDto, TimetableSource, load_or_empty, load_timetable,
};
