//! Application configuration.
//!
//! Everything is read from `BUS_TIMETABLE_*` environment variables, each
//! with a default suitable for running from the repository root.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::assets::{CacheConfig, PRECACHE_URLS};
use crate::timetable::TimetableSource;

const DEFAULT_DATA: &str = "static/data.json";
const DEFAULT_STORE: &str = "bus_timetable_store.json";
const DEFAULT_STATIC_DIR: &str = "static";

/// Error returned when an environment variable has an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    key: &'static str,
    value: String,
    reason: &'static str,
}

/// Settings for the whole application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,

    /// Where the timetable document is loaded from.
    pub data_source: TimetableSource,

    /// File holding favorites and recent searches.
    pub store_path: PathBuf,

    /// Directory served under `/static`.
    pub static_dir: PathBuf,

    /// Offline asset cache settings.
    pub cache: CacheConfig,

    /// Remove favorites for routes missing from the timetable at startup.
    pub prune_stale_favorites: bool,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let listen_addr = match get("BUS_TIMETABLE_ADDR") {
            Some(v) => v.parse().map_err(|_| ConfigError {
                key: "BUS_TIMETABLE_ADDR",
                value: v.clone(),
                reason: "expected host:port",
            })?,
            None => defaults.listen_addr,
        };

        let data_source = get("BUS_TIMETABLE_DATA")
            .map(|v| TimetableSource::parse(&v))
            .unwrap_or(defaults.data_source);

        let store_path = get("BUS_TIMETABLE_STORE")
            .map(PathBuf::from)
            .unwrap_or(defaults.store_path);

        let static_dir = get("BUS_TIMETABLE_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let version = get("BUS_TIMETABLE_CACHE_VERSION").unwrap_or(defaults.cache.version);

        let max_capacity = match get("BUS_TIMETABLE_CACHE_CAPACITY") {
            Some(v) => {
                let capacity: u64 = v.parse().map_err(|_| ConfigError {
                    key: "BUS_TIMETABLE_CACHE_CAPACITY",
                    value: v.clone(),
                    reason: "expected a non-negative integer",
                })?;
                if capacity < PRECACHE_URLS.len() as u64 {
                    return Err(ConfigError {
                        key: "BUS_TIMETABLE_CACHE_CAPACITY",
                        value: v,
                        reason: "too small to hold every precached asset",
                    });
                }
                capacity
            }
            None => defaults.cache.max_capacity,
        };

        let prune_stale_favorites = match get("BUS_TIMETABLE_PRUNE_FAVORITES") {
            Some(v) => parse_bool(&v).ok_or(ConfigError {
                key: "BUS_TIMETABLE_PRUNE_FAVORITES",
                value: v.clone(),
                reason: "expected true or false",
            })?,
            None => defaults.prune_stale_favorites,
        };

        Ok(Self {
            listen_addr,
            data_source,
            store_path,
            static_dir,
            cache: CacheConfig {
                version,
                max_capacity,
            },
            prune_stale_favorites,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_source: TimetableSource::parse(DEFAULT_DATA),
            store_path: PathBuf::from(DEFAULT_STORE),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            cache: CacheConfig::default(),
            prune_stale_favorites: false,
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
