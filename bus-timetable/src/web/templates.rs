//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{Route, Trip};
use crate::storage::RecentSearch;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page with the search form and recent searches.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub form: SearchFormView,
    pub recent: Vec<RecentSearch>,
}

/// Search results page.
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate {
    pub form: SearchFormView,
    pub recent: Vec<RecentSearch>,
    pub routes: Vec<RouteView>,
    /// Active sort key, empty when unsorted
    pub sort: String,
    pub filter: String,
}

/// Full timing table of one route.
#[derive(Template)]
#[template(path = "timings.html")]
pub struct TimingsTemplate {
    pub route: RouteView,
    pub trips: Vec<TripView>,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// State of the from/to dropdowns.
#[derive(Debug, Clone, Default)]
pub struct SearchFormView {
    pub locations: Vec<String>,
    pub selected_from: String,
    pub selected_to: String,
}

impl SearchFormView {
    pub fn is_from(&self, location: &str) -> bool {
        self.selected_from == location
    }

    pub fn is_to(&self, location: &str) -> bool {
        self.selected_to == location
    }
}

/// Route card view model.
#[derive(Debug, Clone)]
pub struct RouteView {
    pub id: String,
    pub name: String,
    pub operator: String,
    pub kind: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub trip_count: usize,
    pub is_favorite: bool,
}

impl RouteView {
    /// Create from a domain Route and its favorite flag.
    pub fn from_route(route: &Route, is_favorite: bool) -> Self {
        let first = route.first_trip();
        Self {
            id: route.id.to_string(),
            name: route.name.clone(),
            operator: route.operator.clone(),
            kind: route.kind.clone(),
            departure: first.departure.to_string(),
            arrival: first.arrival.to_string(),
            duration: first.duration().to_string(),
            trip_count: route.trip_count(),
            is_favorite,
        }
    }

    /// e.g. "3 trips daily"
    pub fn trips_summary(&self) -> String {
        match self.trip_count {
            1 => "1 trip daily".to_string(),
            n => format!("{n} trips daily"),
        }
    }
}

/// Row of the timing table.
#[derive(Debug, Clone)]
pub struct TripView {
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    /// Arrives on the day after it departs
    pub is_overnight: bool,
}

impl From<Trip> for TripView {
    fn from(trip: Trip) -> Self {
        Self {
            departure: trip.departure.to_string(),
            arrival: trip.arrival.to_string(),
            duration: trip.duration().to_string(),
            is_overnight: trip.arrival < trip.departure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClockTime, RouteId, RouteParts};

    fn t(s: &str) -> ClockTime {
        ClockTime::parse_hhmm(s).unwrap()
    }

    fn route(trips: &[(&str, &str)]) -> Route {
        route_with_id("r1", trips)
    }

    fn route_with_id(id: &str, trips: &[(&str, &str)]) -> Route {
        Route::new(
            RouteParts {
                id: RouteId::new(id),
                name: "Coastal <Express>".to_string(),
                operator: "Konkan Lines".to_string(),
                kind: "AC".to_string(),
                from: "Mumbai".to_string(),
                to: "Goa".to_string(),
            },
            trips.iter().map(|(d, _)| t(d)).collect(),
            trips.iter().map(|(_, a)| t(a)).collect(),
        )
        .unwrap()
    }

    #[test]
    fn trips_summary_pluralises() {
        let one = RouteView::from_route(&route(&[("08:00", "10:00")]), false);
        assert_eq!(one.trips_summary(), "1 trip daily");

        let two = RouteView::from_route(&route(&[("08:00", "10:00"), ("12:00", "14:00")]), false);
        assert_eq!(two.trips_summary(), "2 trips daily");
    }

    #[test]
    fn trip_view_marks_overnight() {
        let r = route(&[("08:00", "10:00"), ("22:00", "06:00")]);
        let views: Vec<TripView> = r.trips().map(TripView::from).collect();
        assert!(!views[0].is_overnight);
        assert!(views[1].is_overnight);
        assert_eq!(views[1].duration, "8h 0m");
    }

    #[test]
    fn form_selection() {
        let form = SearchFormView {
            locations: vec!["Mumbai".into(), "Goa".into()],
            selected_from: "Mumbai".into(),
            selected_to: String::new(),
        };
        assert!(form.is_from("Mumbai"));
        assert!(!form.is_to("Goa"));
    }

    #[test]
    fn results_page_escapes_and_renders() {
        let r = route(&[("08:00", "10:30")]);
        let html = ResultsTemplate {
            form: SearchFormView {
                locations: vec!["Mumbai".into(), "Goa".into()],
                selected_from: "Mumbai".into(),
                selected_to: "Goa".into(),
            },
            recent: vec![RecentSearch::new("Mumbai", "Goa")],
            routes: vec![RouteView::from_route(&r, true)],
            sort: "time".into(),
            filter: String::new(),
        }
        .render()
        .unwrap();

        assert!(html.contains("Coastal &lt;Express&gt;"));
        assert!(html.contains("2h 30m"));
        assert!(html.contains("/routes/r1"));
    }

    #[test]
    fn results_page_encodes_route_ids_in_links() {
        let r = route_with_id("night/7 #2", &[("22:00", "06:00")]);
        let html = ResultsTemplate {
            form: SearchFormView::default(),
            recent: vec![],
            routes: vec![RouteView::from_route(&r, false)],
            sort: String::new(),
            filter: String::new(),
        }
        .render()
        .unwrap();

        assert!(html.contains("/routes/night%2F7%20%232"));
        assert!(html.contains("/favorites/night%2F7%20%232"));
        assert!(!html.contains("/routes/night/7"));
    }

    #[test]
    fn results_page_without_routes() {
        let html = ResultsTemplate {
            form: SearchFormView::default(),
            recent: vec![],
            routes: vec![],
            sort: String::new(),
            filter: String::new(),
        }
        .render()
        .unwrap();

        assert!(html.contains("No buses found for this route"));
    }

    #[test]
    fn timings_page_lists_every_trip() {
        let r = route(&[("08:00", "10:00"), ("22:00", "06:00")]);
        let html = TimingsTemplate {
            route: RouteView::from_route(&r, false),
            trips: r.trips().map(TripView::from).collect(),
        }
        .render()
        .unwrap();

        assert!(html.contains("22:00"));
        assert!(html.contains("8h 0m"));
    }
}
