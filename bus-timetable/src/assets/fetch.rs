//! Fetching assets from where they really live.

use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use axum::body::Bytes;

use super::error::AssetError;

/// URL prefix under which local static files are addressed.
const STATIC_PREFIX: &str = "/static/";

/// A fetched asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub content_type: String,
    pub body: Bytes,
}

/// Source of assets on a cache miss.
pub trait AssetFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Asset, AssetError>> + Send;
}

/// Fetches `/static/...` paths from a local directory and absolute
/// `http(s)` URLs over the network.
#[derive(Debug, Clone)]
pub struct OriginFetcher {
    static_dir: PathBuf,
    http: reqwest::Client,
}

impl OriginFetcher {
    pub fn new(static_dir: impl Into<PathBuf>, timeout: Duration) -> Result<Self, AssetError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            static_dir: static_dir.into(),
            http,
        })
    }

    /// Map a `/static/...` URL to a file inside the static directory.
    ///
    /// Returns `None` for anything that would escape the directory.
    fn local_path(&self, url: &str) -> Option<PathBuf> {
        let relative = Path::new(url.strip_prefix(STATIC_PREFIX)?);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        (safe && !relative.as_os_str().is_empty()).then(|| self.static_dir.join(relative))
    }

    async fn fetch_local(&self, url: &str) -> Result<Asset, AssetError> {
        let path = self.local_path(url).ok_or_else(|| AssetError::NotFound {
            url: url.to_string(),
        })?;

        let body = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AssetError::NotFound {
                    url: url.to_string(),
                }
            } else {
                AssetError::Io {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        Ok(Asset {
            content_type: content_type_for(url).to_string(),
            body: Bytes::from(body),
        })
    }

    async fn fetch_remote(&self, url: &str) -> Result<Asset, AssetError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| content_type_for(url).to_string());
        let body = response.bytes().await?;

        Ok(Asset { content_type, body })
    }
}

impl AssetFetcher for OriginFetcher {
    async fn fetch(&self, url: &str) -> Result<Asset, AssetError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            self.fetch_remote(url).await
        } else {
            self.fetch_local(url).await
        }
    }
}

/// Content type for an asset, guessed from its extension.
pub fn content_type_for(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let ext = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");

    match ext {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "ico" => "image/x-icon",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}
