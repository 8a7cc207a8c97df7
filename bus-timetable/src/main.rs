use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bus_timetable::assets::{OfflineAssets, OriginFetcher, PRECACHE_URLS};
use bus_timetable::config::AppConfig;
use bus_timetable::storage::{FileStore, KeyValueStore, prune_stale_favorites};
use bus_timetable::timetable::{DEFAULT_TIMEOUT_SECS, load_or_empty};
use bus_timetable::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bus_timetable=info,tower_http=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(2);
        }
    };

    // A broken data source still yields a usable (empty) app
    let timetable = load_or_empty(&config.data_source).await;

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.store_path));
    if config.prune_stale_favorites
        && let Err(e) = prune_stale_favorites(store.as_ref(), &timetable)
    {
        warn!(error = %e, "failed to prune stale favorites");
    }

    let fetcher = match OriginFetcher::new(
        &config.static_dir,
        Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    ) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!(error = %e, "failed to create asset fetcher");
            std::process::exit(1);
        }
    };
    let assets = OfflineAssets::new(fetcher, &config.cache);
    if let Err(e) = assets.install(PRECACHE_URLS).await {
        warn!(cache = assets.version(), error = %e, "offline asset install failed, serving from origin");
    }

    let state = AppState::new(timetable, store, assets);
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.listen_addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!("Bus timetable listening on http://{}", config.listen_addr);
    info!("  GET  /                 - Search page");
    info!("  GET  /search           - Find routes (?from=&to=&sort=&filter=)");
    info!("  GET  /routes/:id       - All timings for a route");
    info!("  POST /favorites/:id    - Toggle a favorite");
    info!("  GET  /api/locations    - Known locations");
    info!("  GET  /api/recent       - Recent searches");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        std::process::exit(1);
    }
}
