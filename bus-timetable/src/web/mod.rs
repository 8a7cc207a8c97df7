//! Web layer for the bus timetable.
//!
//! Provides HTML pages and a JSON API over the route query engine.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;
