//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Route, Trip};
use crate::storage::RecentSearch;

/// Query string of a route search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    /// Origin location
    pub from: Option<String>,

    /// Destination location
    pub to: Option<String>,

    /// Sort key: "time", "duration" or "type"
    pub sort: Option<String>,

    /// Case-insensitive route name filter
    pub filter: Option<String>,
}

/// A route in search results.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub id: String,
    pub name: String,
    pub operator: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub from: String,
    pub to: String,

    /// First departure of the day
    pub departure: String,

    /// Arrival of the first trip
    pub arrival: String,

    /// Duration of the first trip, e.g. "2h 30m"
    pub duration: String,

    /// Number of trips per day
    pub trip_count: usize,

    /// Whether the route is marked as a favorite
    pub favorite: bool,
}

impl RouteResult {
    pub fn from_route(route: &Route, favorite: bool) -> Self {
        let first = route.first_trip();
        Self {
            id: route.id.to_string(),
            name: route.name.clone(),
            operator: route.operator.clone(),
            kind: route.kind.clone(),
            from: route.from.clone(),
            to: route.to.clone(),
            departure: first.departure.to_string(),
            arrival: first.arrival.to_string(),
            duration: first.duration().to_string(),
            trip_count: route.trip_count(),
            favorite,
        }
    }
}

/// Response to a route search.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub from: String,
    pub to: String,
    pub routes: Vec<RouteResult>,
}

/// One trip of a route.
#[derive(Debug, Serialize)]
pub struct TripResult {
    pub departure: String,
    pub arrival: String,
    pub duration: String,
}

impl From<Trip> for TripResult {
    fn from(trip: Trip) -> Self {
        Self {
            departure: trip.departure.to_string(),
            arrival: trip.arrival.to_string(),
            duration: trip.duration().to_string(),
        }
    }
}

/// Full timing table of a route.
#[derive(Debug, Serialize)]
pub struct TimingsResponse {
    pub route: RouteResult,
    pub trips: Vec<TripResult>,
}

/// Result of toggling a favorite.
#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub route_id: String,
    pub favorite: bool,
}

/// All known locations.
#[derive(Debug, Serialize)]
pub struct LocationsResponse {
    pub locations: Vec<String>,
}

/// Recent searches, most recent first.
#[derive(Debug, Serialize)]
pub struct RecentSearchesResponse {
    pub searches: Vec<RecentSearch>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
