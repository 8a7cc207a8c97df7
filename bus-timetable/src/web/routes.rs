//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, Uri, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::assets::AssetError;
use crate::domain::RouteId;
use crate::query::{SearchQuery, ValidationError, filter_results, sort_results};
use crate::storage::{
    StoreError, is_favorite, load_recent_searches, record_recent_search, toggle_favorite,
};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/locations", get(list_locations))
        .route("/api/recent", get(recent_searches))
        .route("/search", get(search_routes))
        .route("/routes/:id", get(route_timings))
        .route("/favorites/:id", post(toggle_route_favorite))
        .route("/static/*path", get(static_asset))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Where to send a browser back to after a form post.
///
/// Only paths on this host are honoured; anything else goes to `/`.
fn same_origin_referer(headers: &HeaderMap) -> String {
    let referer = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<Uri>().ok());
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());

    let Some(referer) = referer else {
        return "/".to_string();
    };

    let same_origin = match referer.authority() {
        Some(authority) => host.is_some_and(|host| authority.as_str() == host),
        None => referer.scheme().is_none(),
    };

    match referer.path_and_query() {
        // "//host" would be read as a protocol-relative URL
        Some(target)
            if same_origin && target.as_str().starts_with('/') && !target.as_str().starts_with("//") =>
        {
            target.as_str().to_string()
        }
        _ => "/".to_string(),
    }
}

/// Render the error page with the given status.
fn error_page(status: StatusCode, title: &str, message: &str) -> Response {
    let template = ErrorTemplate {
        title: title.to_string(),
        message: message.to_string(),
    };
    let html = template
        .render()
        .unwrap_or_else(|e| format!("Template error: {}", e));
    (status, Html(html)).into_response()
}

fn search_form(state: &AppState, from: &str, to: &str) -> SearchFormView {
    SearchFormView {
        locations: state.timetable.locations().to_vec(),
        selected_from: from.to_string(),
        selected_to: to.to_string(),
    }
}

/// Index page with the search form.
async fn index_page(State(state): State<AppState>) -> impl IntoResponse {
    let template = IndexTemplate {
        form: search_form(&state, "", ""),
        recent: load_recent_searches(state.store.as_ref()),
    };
    Html(
        template
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// All known locations.
async fn list_locations(State(state): State<AppState>) -> Json<LocationsResponse> {
    Json(LocationsResponse {
        locations: state.timetable.locations().to_vec(),
    })
}

/// Recent searches, most recent first.
async fn recent_searches(State(state): State<AppState>) -> Json<RecentSearchesResponse> {
    Json(RecentSearchesResponse {
        searches: load_recent_searches(state.store.as_ref()),
    })
}

/// Search for routes between two locations.
async fn search_routes(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<SearchRequest>,
) -> Result<Response, AppError> {
    let html = accepts_html(&headers);

    let query = match SearchQuery::new(req.from.as_deref(), req.to.as_deref()) {
        Ok(query) => query,
        Err(e) if html => {
            return Ok(error_page(StatusCode::BAD_REQUEST, "Missing selection", &e.to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let matches = query.run(&state.timetable);

    // A failed write should not cost the user their results
    let recent = record_recent_search(state.store.as_ref(), &query.from, &query.to)
        .unwrap_or_else(|e| {
            warn!(error = %e, "failed to record recent search");
            load_recent_searches(state.store.as_ref())
        });

    let sort = req.sort.unwrap_or_default();
    let filter = req.filter.unwrap_or_default();
    let routes = filter_results(sort_results(matches, &sort), &filter);

    debug!(
        from = %query.from,
        to = %query.to,
        sort = %sort,
        filter = %filter,
        count = routes.len(),
        "route search"
    );

    if html {
        let template = ResultsTemplate {
            form: search_form(&state, &query.from, &query.to),
            recent,
            routes: routes
                .iter()
                .map(|r| RouteView::from_route(r, is_favorite(state.store.as_ref(), &r.id)))
                .collect(),
            sort,
            filter,
        };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

        Ok(Html(html).into_response())
    } else {
        let routes = routes
            .iter()
            .map(|r| RouteResult::from_route(r, is_favorite(state.store.as_ref(), &r.id)))
            .collect();

        Ok(Json(SearchResponse {
            from: query.from,
            to: query.to,
            routes,
        })
        .into_response())
    }
}

/// Full timing table of a route.
async fn route_timings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let html = accepts_html(&headers);
    let route_id = RouteId::new(id);

    let Some(route) = state.timetable.route(&route_id) else {
        let message = format!("Route {} not found", route_id);
        if html {
            return Ok(error_page(StatusCode::NOT_FOUND, "Unknown route", &message));
        }
        return Err(AppError::NotFound { message });
    };

    let favorite = is_favorite(state.store.as_ref(), &route.id);

    if html {
        let template = TimingsTemplate {
            route: RouteView::from_route(route, favorite),
            trips: route.trips().map(TripView::from).collect(),
        };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

        Ok(Html(html).into_response())
    } else {
        Ok(Json(TimingsResponse {
            route: RouteResult::from_route(route, favorite),
            trips: route.trips().map(TripResult::from).collect(),
        })
        .into_response())
    }
}

/// Flip a route's favorite flag.
///
/// HTML form posts are redirected back to the page they came from.
async fn toggle_route_favorite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let route_id = RouteId::new(id);
    if !state.timetable.contains_route(&route_id) {
        return Err(AppError::NotFound {
            message: format!("Route {} not found", route_id),
        });
    }

    let favorite = toggle_favorite(state.store.as_ref(), &route_id)?;
    debug!(route_id = %route_id, favorite, "toggled favorite");

    if accepts_html(&headers) {
        Ok(Redirect::to(&same_origin_referer(&headers)).into_response())
    } else {
        Ok(Json(FavoriteResponse {
            route_id: route_id.to_string(),
            favorite,
        })
        .into_response())
    }
}

/// Static assets, served cache-first.
async fn static_asset(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let url = format!("/static/{path}");
    let asset = state.assets.respond(&url).await?;
    Ok(([(header::CONTENT_TYPE, asset.content_type)], asset.body).into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<AssetError> for AppError {
    fn from(e: AssetError) -> Self {
        match e {
            AssetError::NotFound { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            debug!(%status, "{message}");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{CacheConfig, OfflineAssets, OriginFetcher};
    use crate::domain::{ClockTime, Route, RouteParts, Timetable};
    use crate::storage::{KeyValueStore, MemoryStore};
    use axum::body::to_bytes;
    use axum::http::HeaderValue;
    use std::sync::Arc;
    use std::time::Duration;

    fn route(id: &str, name: &str, kind: &str, dep: &str, arr: &str) -> Route {
        Route::new(
            RouteParts {
                id: RouteId::new(id),
                name: name.to_string(),
                operator: "Op".to_string(),
                kind: kind.to_string(),
                from: "Pune".to_string(),
                to: "Mumbai".to_string(),
            },
            vec![ClockTime::parse_hhmm(dep).unwrap()],
            vec![ClockTime::parse_hhmm(arr).unwrap()],
        )
        .unwrap()
    }

    fn state() -> (AppState, Arc<MemoryStore>) {
        state_serving(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
    }

    fn state_serving(static_dir: impl Into<std::path::PathBuf>) -> (AppState, Arc<MemoryStore>) {
        let timetable = Timetable::new(
            vec![
                route("1", "Deccan Queen", "Sleeper", "07:00", "10:30"),
                route("2", "Shivneri Express", "AC", "06:00", "09:00"),
            ],
            vec!["Pune".into(), "Mumbai".into()],
        );
        let store = Arc::new(MemoryStore::new());
        let fetcher = OriginFetcher::new(static_dir, Duration::from_secs(1)).unwrap();
        let assets = OfflineAssets::new(fetcher, &CacheConfig::default());
        (AppState::new(timetable, store.clone(), assets), store)
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn html_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html,*/*"));
        headers
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn search(from: &str, to: &str, sort: Option<&str>, filter: Option<&str>) -> SearchRequest {
        SearchRequest {
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            sort: sort.map(str::to_string),
            filter: filter.map(str::to_string),
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn referer_headers(host: &'static str, referer: &'static str) -> HeaderMap {
        let mut headers = html_headers();
        headers.insert(header::HOST, HeaderValue::from_static(host));
        headers.insert(header::REFERER, HeaderValue::from_static(referer));
        headers
    }

    #[test]
    fn accepts_html_detection() {
        assert!(accepts_html(&html_headers()));
        assert!(!accepts_html(&json_headers()));
        assert!(!accepts_html(&HeaderMap::new()));
    }

    #[tokio::test]
    async fn search_sorts_filters_and_records() {
        let (state, store) = state();

        let response = search_routes(
            State(state),
            json_headers(),
            Query(search("Pune", "Mumbai", Some("time"), Some("EXP"))),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let names: Vec<&str> = json["routes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Shivneri Express"]);

        assert_eq!(
            store.get("recentSearches").as_deref(),
            Some(r#"[{"from":"Pune","to":"Mumbai"}]"#)
        );
    }

    #[tokio::test]
    async fn search_without_destination_is_rejected() {
        let (state, store) = state();

        let req = SearchRequest {
            from: Some("Pune".to_string()),
            ..SearchRequest::default()
        };
        let err = search_routes(State(state.clone()), json_headers(), Query(req))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let response = search_routes(
            State(state),
            html_headers(),
            Query(SearchRequest::default()),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert!(store.get("recentSearches").is_none());
    }

    #[tokio::test]
    async fn toggling_favorites() {
        let (state, _store) = state();

        let first = toggle_route_favorite(State(state.clone()), json_headers(), Path("1".into()))
            .await
            .unwrap();
        assert_eq!(body_json(first).await["favorite"], true);

        let second = toggle_route_favorite(State(state.clone()), json_headers(), Path("1".into()))
            .await
            .unwrap();
        assert_eq!(body_json(second).await["favorite"], false);

        let missing = toggle_route_favorite(State(state), json_headers(), Path("99".into()))
            .await
            .unwrap_err();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn referer_must_be_same_origin() {
        let cases = [
            ("http://localhost:3000/search?from=Pune&to=Mumbai", "/search?from=Pune&to=Mumbai"),
            ("/routes/1", "/routes/1"),
            ("https://evil.example/phish", "/"),
            ("http://localhost:3001/search", "/"),
            ("//evil.example/phish", "/"),
            ("http://localhost:3000//evil.example", "/"),
        ];
        for (referer, expected) in cases {
            let headers = referer_headers("localhost:3000", referer);
            assert_eq!(same_origin_referer(&headers), expected, "referer {referer}");
        }

        assert_eq!(same_origin_referer(&html_headers()), "/");
    }

    #[tokio::test]
    async fn html_favorite_post_redirects_back_on_this_host_only() {
        let (state, _store) = state();

        let response = toggle_route_favorite(
            State(state.clone()),
            referer_headers("localhost:3000", "http://localhost:3000/search?from=Pune&to=Mumbai"),
            Path("1".into()),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/search?from=Pune&to=Mumbai"
        );

        let response = toggle_route_favorite(
            State(state),
            referer_headers("localhost:3000", "https://evil.example/"),
            Path("1".into()),
        )
        .await
        .unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn index_lists_recent_searches() {
        let (state, store) = state();
        record_recent_search(store.as_ref(), "Pune", "Mumbai").unwrap();
        record_recent_search(store.as_ref(), "Mumbai", "Pune").unwrap();

        let html = body_text(index_page(State(state)).await.into_response()).await;

        assert!(html.contains("Recent searches"));
        let newest = html.find("Mumbai &rarr; Pune").unwrap();
        let older = html.find("Pune &rarr; Mumbai").unwrap();
        assert!(newest < older);
        assert!(html.contains(r#"<option value="Pune">Pune</option>"#));
    }

    #[tokio::test]
    async fn index_without_history_has_no_recent_section() {
        let (state, _store) = state();
        let html = body_text(index_page(State(state)).await.into_response()).await;
        assert!(!html.contains("Recent searches"));
    }

    #[tokio::test]
    async fn locations_endpoint_lists_timetable_locations() {
        let (state, _store) = state();
        let Json(response) = list_locations(State(state)).await;
        assert_eq!(response.locations, ["Pune", "Mumbai"]);
    }

    #[tokio::test]
    async fn static_assets_are_served_cache_first() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.css"), "body { color: red }").unwrap();
        let (state, _store) = state_serving(dir.path());

        state.assets.install(&["/static/main.css"]).await.unwrap();
        std::fs::write(dir.path().join("main.css"), "body { color: blue }").unwrap();

        let response = static_asset(State(state.clone()), Path("main.css".into()))
            .await
            .unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css; charset=utf-8");
        assert_eq!(body_text(response).await, "body { color: red }");

        // Not precached, so read straight from disk
        std::fs::write(dir.path().join("extra.css"), "p {}").unwrap();
        let response = static_asset(State(state.clone()), Path("extra.css".into()))
            .await
            .unwrap();
        assert_eq!(body_text(response).await, "p {}");

        let missing = static_asset(State(state), Path("nope.css".into()))
            .await
            .unwrap_err();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn timings_for_known_and_unknown_routes() {
        let (state, _store) = state();

        let response = route_timings(State(state.clone()), json_headers(), Path("2".into()))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["route"]["name"], "Shivneri Express");
        assert_eq!(json["trips"][0]["duration"], "3h 0m");

        let response = route_timings(State(state), html_headers(), Path("nope".into()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
