//! The in-memory timetable.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use super::route::{Location, Route, RouteId};

/// Full reference data set of routes and locations.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Timetable {
    routes: Vec<Route>,
    locations: Vec<Location>,
}

impl Timetable {
    /// Build a timetable from validated routes and a location list.
    ///
    /// Locations keep their given order with duplicates removed. When no
    /// locations are given, they are derived from the route endpoints in
    /// sorted order.
    pub fn new(routes: Vec<Route>, locations: Vec<Location>) -> Self {
        let locations = if locations.is_empty() {
            routes
                .iter()
                .flat_map(|r| [r.from.clone(), r.to.clone()])
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        } else {
            let mut seen = HashSet::new();
            locations
                .into_iter()
                .filter(|l| seen.insert(l.clone()))
                .collect()
        };

        Self { routes, locations }
    }

    /// A timetable with no routes and no locations.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Look up a route by id.
    pub fn route(&self, id: &RouteId) -> Option<&Route> {
        self.routes.iter().find(|r| &r.id == id)
    }

    pub fn contains_route(&self, id: &RouteId) -> bool {
        self.route(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClockTime, RouteParts};

    fn route(id: &str, from: &str, to: &str) -> Route {
        let t = ClockTime::parse_hhmm("08:00").unwrap();
        Route::new(
            RouteParts {
                id: RouteId::new(id),
                name: format!("{from} - {to}"),
                operator: "Op".to_string(),
                kind: "AC".to_string(),
                from: from.to_string(),
                to: to.to_string(),
            },
            vec![t],
            vec![t],
        )
        .unwrap()
    }

    #[test]
    fn derives_locations_when_absent() {
        let tt = Timetable::new(
            vec![route("1", "Pune", "Mumbai"), route("2", "Mumbai", "Goa")],
            vec![],
        );
        assert_eq!(tt.locations(), ["Goa", "Mumbai", "Pune"]);
    }

    #[test]
    fn keeps_given_location_order_without_duplicates() {
        let tt = Timetable::new(
            vec![],
            vec!["Pune".into(), "Goa".into(), "Pune".into(), "Agra".into()],
        );
        assert_eq!(tt.locations(), ["Pune", "Goa", "Agra"]);
    }

    #[test]
    fn looks_up_routes_by_id() {
        let tt = Timetable::new(vec![route("1", "A", "B"), route("2", "B", "C")], vec![]);
        assert_eq!(tt.route(&RouteId::new("2")).unwrap().from, "B");
        assert!(tt.route(&RouteId::new("3")).is_none());
        assert!(tt.contains_route(&RouteId::new("1")));
    }

    #[test]
    fn empty_timetable() {
        let tt = Timetable::empty();
        assert!(tt.is_empty());
        assert!(tt.routes().is_empty());
        assert!(tt.locations().is_empty());
    }
}
