//! Bus routes and their trips.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::DomainError;
use super::time::{ClockTime, TripDuration};

/// A location (stop or city) name, compared by exact string equality.
pub type Location = String;

/// Identifier of a route.
///
/// The data source may use either JSON strings or integers for ids; both
/// normalise to the same textual form, so `7` and `"7"` are the same id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawRouteId", into = "String")]
pub struct RouteId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRouteId {
    Text(String),
    Integer(i64),
}

impl From<RawRouteId> for RouteId {
    fn from(raw: RawRouteId) -> Self {
        match raw {
            RawRouteId::Text(s) => Self(s),
            RawRouteId::Integer(n) => Self(n.to_string()),
        }
    }
}

impl From<RouteId> for String {
    fn from(id: RouteId) -> Self {
        id.0
    }
}

impl RouteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One departure/arrival pair of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trip {
    pub departure: ClockTime,
    pub arrival: ClockTime,
}

impl Trip {
    pub fn duration(&self) -> TripDuration {
        TripDuration::between(self.departure, self.arrival)
    }
}

/// A scheduled bus service between two fixed locations.
///
/// Invariants (enforced by [`Route::new`]):
/// - `departures` and `arrivals` have the same length
/// - there is at least one trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    pub operator: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub from: Location,
    pub to: Location,
    departures: Vec<ClockTime>,
    arrivals: Vec<ClockTime>,
}

/// Fields of a route before its trips have been checked.
#[derive(Debug, Clone)]
pub struct RouteParts {
    pub id: RouteId,
    pub name: String,
    pub operator: String,
    pub kind: String,
    pub from: Location,
    pub to: Location,
}

impl Route {
    /// Build a route, checking that departures and arrivals line up.
    pub fn new(
        parts: RouteParts,
        departures: Vec<ClockTime>,
        arrivals: Vec<ClockTime>,
    ) -> Result<Self, DomainError> {
        if departures.len() != arrivals.len() {
            return Err(DomainError::MismatchedTrips {
                departures: departures.len(),
                arrivals: arrivals.len(),
            });
        }
        if departures.is_empty() {
            return Err(DomainError::NoTrips);
        }

        let RouteParts {
            id,
            name,
            operator,
            kind,
            from,
            to,
        } = parts;

        Ok(Self {
            id,
            name,
            operator,
            kind,
            from,
            to,
            departures,
            arrivals,
        })
    }

    pub fn departures(&self) -> &[ClockTime] {
        &self.departures
    }

    pub fn arrivals(&self) -> &[ClockTime] {
        &self.arrivals
    }

    /// All trips, in source order.
    pub fn trips(&self) -> impl Iterator<Item = Trip> + '_ {
        self.departures
            .iter()
            .zip(&self.arrivals)
            .map(|(&departure, &arrival)| Trip { departure, arrival })
    }

    /// The first trip of the day as listed in the source.
    pub fn first_trip(&self) -> Trip {
        Trip {
            departure: self.departures[0],
            arrival: self.arrivals[0],
        }
    }

    pub fn trip_count(&self) -> usize {
        self.departures.len()
    }
}
