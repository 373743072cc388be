//! Fetching and on-disk caching of upstream files. No retries: a failed fetch fails the caller.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{MergeError, Result};

/// Source of raw bytes by url. The HTTP client is one implementation; tests supply their own.
pub trait Fetcher: Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("teamplanner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| MergeError::Fetch {
                url: String::new(),
                reason: err.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let fetch_err = |reason: String| MergeError::Fetch {
            url: url.to_string(),
            reason,
        };
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| fetch_err(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {status}")));
        }
        let bytes = response.bytes().map_err(|err| fetch_err(err.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Whether [fetch_json_cached] read the cache or went to the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Fetched,
}

/// Read `path` when caching is on and the file exists; otherwise fetch `url`, store it at `path`, and parse.
pub fn fetch_json_cached<T, F>(
    fetcher: &F,
    url: &str,
    path: &Path,
    use_cache: bool,
) -> Result<(T, CacheStatus)>
where
    T: DeserializeOwned,
    F: Fetcher + ?Sized,
{
    if use_cache && path.is_file() {
        debug!(path = %path.display(), "using cached file");
        let raw = fs::read(path)?;
        return Ok((serde_json::from_slice(&raw)?, CacheStatus::Hit));
    }

    info!(url, "fetching");
    let raw = fetcher.fetch(url)?;
    let parsed = serde_json::from_slice(&raw)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &raw)?;
    Ok((parsed, CacheStatus::Fetched))
}
