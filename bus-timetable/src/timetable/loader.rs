//! Fetching and validating the timetable document.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info, warn};

use super::error::DataLoadError;
use crate::domain::{ClockTime, DomainError, Location, Route, RouteId, RouteParts, Timetable};

/// Request timeout for remote data sources.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Wire format of the timetable document.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetableDto {
    #[serde(default)]
    pub locations: Vec<Location>,
    /// Kept raw so one malformed route can't sink the whole document.
    #[serde(default)]
    pub routes: Vec<serde_json::Value>,
}

/// Wire format of a single route, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDto {
    pub id: RouteId,
    pub name: String,
    pub operator: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub from: Location,
    pub to: Location,
    pub departures: Vec<String>,
    pub arrivals: Vec<String>,
}

impl RouteDto {
    /// Validate into a domain route.
    pub fn into_route(self) -> Result<Route, DomainError> {
        let departures = parse_times(&self.departures)?;
        let arrivals = parse_times(&self.arrivals)?;

        Route::new(
            RouteParts {
                id: self.id,
                name: self.name,
                operator: self.operator,
                kind: self.kind,
                from: self.from,
                to: self.to,
            },
            departures,
            arrivals,
        )
    }
}

fn parse_times(times: &[String]) -> Result<Vec<ClockTime>, DomainError> {
    times
        .iter()
        .map(|s| ClockTime::parse_hhmm(s).map_err(DomainError::from))
        .collect()
}

impl TimetableDto {
    /// Validate every route, dropping the ones that break the route invariants.
    pub fn into_timetable(self) -> Timetable {
        let mut seen = HashSet::new();
        let mut routes = Vec::with_capacity(self.routes.len());

        for (index, raw) in self.routes.into_iter().enumerate() {
            let dto = match serde_json::from_value::<RouteDto>(raw) {
                Ok(dto) => dto,
                Err(e) => {
                    warn!(index, error = %e, "skipping malformed route");
                    continue;
                }
            };

            let id = dto.id.clone();
            let result = if seen.contains(&id) {
                Err(DomainError::DuplicateId(id.clone()))
            } else {
                dto.into_route()
            };

            match result {
                Ok(route) => {
                    seen.insert(id);
                    routes.push(route);
                }
                Err(e) => warn!(route_id = %id, error = %e, "skipping invalid route"),
            }
        }

        Timetable::new(routes, self.locations)
    }
}

/// Where the timetable document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimetableSource {
    /// A JSON file on disk
    File(PathBuf),
    /// A JSON document served over HTTP(S)
    Url(String),
}

impl TimetableSource {
    /// Interpret a configured location: `http://` and `https://` are URLs,
    /// anything else is a file path.
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Self::Url(s.to_string())
        } else {
            Self::File(PathBuf::from(s))
        }
    }
}

impl fmt::Display for TimetableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Fetch and parse the timetable document.
pub async fn load_timetable(source: &TimetableSource) -> Result<Timetable, DataLoadError> {
    let body = match source {
        TimetableSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| DataLoadError::Io {
                    path: path.clone(),
                    source: e,
                })?
        }
        TimetableSource::Url(url) => fetch_remote(url).await?,
    };

    let dto: TimetableDto = serde_json::from_str(&body)?;
    Ok(dto.into_timetable())
}

async fn fetch_remote(url: &str) -> Result<String, DataLoadError> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()?;

    let response = http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DataLoadError::Status {
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}

/// Load the timetable, falling back to an empty one on failure.
///
/// A missing or broken data source leaves the app usable with no routes.
pub async fn load_or_empty(source: &TimetableSource) -> Timetable {
    match load_timetable(source).await {
        Ok(timetable) => {
            info!(
                source = %source,
                routes = timetable.routes().len(),
                locations = timetable.locations().len(),
                "loaded timetable"
            );
            timetable
        }
        Err(e) => {
            error!(source = %source, error = %e, "failed to load timetable, continuing with no routes");
            Timetable::empty()
        }
    }
}
