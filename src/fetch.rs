//! HTTP fetching for raw trip data files.
//!
//! The TLC publishes monthly trip files on a public CDN; [`download_to`]
//! pulls one into the local data directory. The [`HttpClient`] trait keeps
//! the transport swappable in tests.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::info;

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response>;
}

/// Plain reqwest-backed client.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}

/// Fetches a URL and returns the response body.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    if !resp.status().is_success() {
        return Err(anyhow!("GET {} returned status {}", url, resp.status()));
    }
    Ok(resp.bytes().await?.to_vec())
}

/// Downloads a URL to a local file and returns the byte count.
#[tracing::instrument(skip(client), fields(url, dest = %dest.display()))]
pub async fn download_to<C: HttpClient>(client: &C, url: &str, dest: &Path) -> Result<u64> {
    let bytes = fetch_bytes(client, url).await?;

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dest, &bytes).with_context(|| format!("writing {}", dest.display()))?;

    info!(bytes = bytes.len(), "Download complete");
    Ok(bytes.len() as u64)
}
