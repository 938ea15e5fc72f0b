//! Archive download into a temporary file.

use futures::StreamExt;
use reqwest::Client;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::error::{InstallError, InstallResult};

/// User-Agent for HTTP requests
pub const USER_AGENT: &str = concat!("langserver/", env!("CARGO_PKG_VERSION"));

/// Downloads release archives.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    /// Create a downloader whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .tcp_nodelay(true)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client, using defaults: {}", e);
                Client::new()
            });

        Self { client }
    }

    /// Download `url` into a fresh temporary file.
    ///
    /// The file is deleted when the returned handle is dropped.
    pub async fn fetch(&self, url: &Url) -> InstallResult<NamedTempFile> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| InstallError::download(url.as_str(), e))?;

        if !response.status().is_success() {
            return Err(InstallError::download(
                url.as_str(),
                format!("server returned status {}", response.status()),
            ));
        }

        let temp = tempfile::Builder::new()
            .prefix("langserver-")
            .suffix(".gz")
            .tempfile()
            .map_err(|e| {
                InstallError::download(url.as_str(), format!("failed to create temp file: {}", e))
            })?;
        let handle = temp
            .reopen()
            .map_err(|e| InstallError::download(url.as_str(), e))?;
        let mut file = tokio::fs::File::from_std(handle);

        let total_size = response.content_length().unwrap_or(0);
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                InstallError::download(url.as_str(), format!("failed to read chunk: {}", e))
            })?;
            file.write_all(&chunk)
                .await
                .map_err(|e| InstallError::download(url.as_str(), e))?;
            downloaded += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| InstallError::download(url.as_str(), e))?;

        tracing::debug!(
            "Downloaded {} of {} bytes to {}",
            downloaded,
            total_size,
            temp.path().display()
        );

        Ok(temp)
    }
}
