//! Bus timetable lookup server.
//!
//! Pick an origin and a destination, see the buses that run between them,
//! sort and filter the results, and keep favorites and recent searches
//! across sessions.

pub mod assets;
pub mod config;
pub mod domain;
pub mod query;
pub mod storage;
pub mod timetable;
pub mod web;
