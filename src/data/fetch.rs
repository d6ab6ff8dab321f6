//! Menu file client
//!
//! Retrieves a month's CSV for a menu option, serving it from the on-disk
//! cache when an entry exists and otherwise downloading it, writing each line
//! to the cache while the body streams in.

use chrono::Month;
use futures::StreamExt;
use reqwest::Client;
use thiserror::Error;

use crate::cache::{CacheManager, CacheWriter};
use crate::config::{LunchConfig, MenuOption};

/// Errors that can occur when retrieving a menu file
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed or returned a non-success status
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Cache file could not be read or written
    #[error("Cache error: {0}")]
    CacheError(#[from] std::io::Error),
}

/// Client for retrieving menu CSV files through the cache
#[derive(Debug, Clone)]
pub struct MenuClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Cache manager for persisting responses
    cache_manager: CacheManager,
    /// Ignore existing entries and download again
    refresh: bool,
}

impl MenuClient {
    /// Creates a new MenuClient backed by the given cache
    pub fn new(cache_manager: CacheManager) -> Self {
        Self {
            http_client: Client::new(),
            cache_manager,
            refresh: false,
        }
    }

    /// Makes every fetch bypass existing cache entries and rewrite them
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Fetches the raw CSV text for `option` in `month`
    ///
    /// # Behavior
    /// - If a cache entry exists for the key, returns it without touching the network
    /// - Otherwise downloads `{basePath}/{schoolYear}/{month}/{path}.csv`, caches
    ///   the body line by line and returns the same text
    /// - An interrupted download leaves any existing cache entry untouched
    pub async fn fetch(
        &self,
        config: &LunchConfig,
        option: &MenuOption,
        month: Month,
    ) -> Result<String, FetchError> {
        let cache_key = config.cache_key(option, month);

        // A refresh only replaces the entry once the new body is complete
        if !self.refresh {
            if let Some(cached) = self.cache_manager.read(&cache_key)? {
                log::debug!("Cache hit for {}", cache_key);
                return Ok(cached);
            }
        }

        log::debug!("Cache miss for {}", cache_key);
        let url = config.url_for(option, month);
        self.download(&url, &cache_key).await
    }

    /// Downloads `url`, writing each line to the cache entry for `cache_key`
    async fn download(&self, url: &str, cache_key: &str) -> Result<String, FetchError> {
        log::debug!("Fetching {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?;

        let mut writer = self.cache_manager.writer(cache_key)?;
        let mut body = String::new();
        let mut pending: Vec<u8> = Vec::new();

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            pending.extend_from_slice(&chunk?);

            while let Some(newline) = pending.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = pending.drain(..=newline).collect();
                push_line(&line[..newline], &mut body, &mut writer)?;
            }
        }

        if !pending.is_empty() {
            push_line(&pending, &mut body, &mut writer)?;
        }

        let path = writer.commit()?;
        log::debug!("Cached {} bytes at {:?}", body.len(), path);

        Ok(body)
    }
}

/// Appends one line (without its terminator) to both the result and the cache
fn push_line(line: &[u8], body: &mut String, writer: &mut CacheWriter) -> std::io::Result<()> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let line = String::from_utf8_lossy(line);

    writer.write_line(&line)?;
    body.push_str(&line);
    body.push('\n');
    Ok(())
}
