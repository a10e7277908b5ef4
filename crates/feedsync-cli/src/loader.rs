//! Source loading: URL or local path -> raw XML text

use async_trait::async_trait;
use feedsync_common::{FeedError, Result};
use std::time::Duration;
use tracing::debug;

/// Default per-request timeout for HTTP sources
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;

/// Resolves a source identifier to the raw feed text
#[async_trait]
pub trait SourceLoader: Send + Sync {
    async fn load(&self, identifier: &str) -> Result<String>;
}

/// Fetches `http://` and `https://` identifiers over HTTP and reads anything
/// else from the local filesystem.
pub struct DefaultLoader {
    client: reqwest::Client,
}

impl DefaultLoader {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("feedsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedError::config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    async fn fetch_url(&self, url: &str) -> Result<String> {
        debug!(url, "Fetching feed over HTTP");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::fetch(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::fetch(format!("{} returned {}", url, status)));
        }

        response
            .text()
            .await
            .map_err(|e| FeedError::fetch(format!("failed to read body of {}: {}", url, e)))
    }

    async fn read_file(&self, path: &str) -> Result<String> {
        debug!(path, "Reading feed from disk");
        tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FeedError::not_found(path.to_string()),
            _ => FeedError::fetch(format!("{}: {}", path, e)),
        })
    }
}

pub fn is_remote(identifier: &str) -> bool {
    identifier.starts_with("http://") || identifier.starts_with("https://")
}

#[async_trait]
impl SourceLoader for DefaultLoader {
    async fn load(&self, identifier: &str) -> Result<String> {
        if is_remote(identifier) {
            self.fetch_url(identifier).await
        } else {
            self.read_file(identifier).await
        }
    }
}
