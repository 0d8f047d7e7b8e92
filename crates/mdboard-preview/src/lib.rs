//! Link-preview fetching for standalone links.
//!
//! This crate is the I/O half of the preview feature: it finds the
//! standalone links in a document, fetches each page, scrapes its Open
//! Graph metadata, and returns a URL-keyed map for the renderer. The
//! renderer itself never performs I/O. A URL that fails to fetch is logged
//! and skipped; the document still renders with a plain link there.

pub mod scrape;

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, warn};

use mdboard_engine::{PreviewInfo, extract_standalone_links};

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = concat!("mdboard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}")]
    Status { url: String, status: u16 },
}

/// Fetches and caches preview metadata.
///
/// The cache is per-client and keyed by URL, so repeated renders of the
/// same document fetch each page once.
pub struct PreviewClient {
    http: reqwest::Client,
    cache: Mutex<HashMap<String, PreviewInfo>>,
}

impl PreviewClient {
    pub fn new() -> Result<Self, PreviewError> {
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(PreviewError::Client)?;
        Ok(Self {
            http,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Fetches one page and scrapes its metadata, consulting the cache
    /// first.
    pub async fn fetch(&self, url: &str) -> Result<PreviewInfo, PreviewError> {
        if let Ok(cache) = self.cache.lock()
            && let Some(hit) = cache.get(url)
        {
            debug!(url, "preview cache hit");
            return Ok(hit.clone());
        }

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| PreviewError::Request {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(PreviewError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response
            .text()
            .await
            .map_err(|source| PreviewError::Request {
                url: url.to_string(),
                source,
            })?;

        let info = scrape::scrape_preview(&body, url);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(url.to_string(), info.clone());
        }
        Ok(info)
    }

    /// Gathers preview data for every standalone link in a document.
    ///
    /// Fetches run concurrently. Failures and pages without usable
    /// metadata are dropped from the map, which downgrades those links to
    /// plain anchors at render time.
    pub async fn prepare_preview_data(&self, markdown: &str) -> HashMap<String, PreviewInfo> {
        let mut urls: Vec<String> = extract_standalone_links(markdown)
            .into_iter()
            .map(|link| link.url)
            .collect();
        urls.sort();
        urls.dedup();

        let fetches = urls.iter().map(|url| async move {
            match self.fetch(url).await {
                Ok(info) if info.has_content() => Some((url.clone(), info)),
                Ok(_) => {
                    debug!(url, "page had no preview metadata");
                    None
                }
                Err(err) => {
                    warn!(url, error = %err, "preview fetch failed");
                    None
                }
            }
        });
        join_all(fetches).await.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds() {
        assert!(PreviewClient::new().is_ok());
    }

    #[test]
    fn cache_short_circuits_fetching() {
        let client = PreviewClient::new().unwrap();
        let info = PreviewInfo {
            title: Some("cached".to_string()),
            ..Default::default()
        };
        client
            .cache
            .lock()
            .unwrap()
            .insert("https://example.com".to_string(), info.clone());

        // No runtime I/O happens for a cache hit, so a tiny executor is
        // enough to drive the future.
        let fetched =
            futures::executor::block_on(client.fetch("https://example.com")).unwrap();
        assert_eq!(fetched, info);
    }
}
