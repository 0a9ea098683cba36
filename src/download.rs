//! Source video download.

use crate::constants::download::CONNECT_TIMEOUT_SECS;
use crate::error::{Error, Result};
use crate::output::ProgressReporter;
use futures_util::StreamExt;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Check whether a source argument names a remote video.
pub fn is_remote_source(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Stream `url` into `dest`, reporting bytes received.
pub async fn download_file(
    client: &Client,
    url: &str,
    dest: &Path,
    reporter: &dyn ProgressReporter,
) -> Result<u64> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::DownloadFailed {
            url: url.to_string(),
            source: Box::new(e),
        })?;

    if !response.status().is_success() {
        return Err(Error::DownloadFailed {
            url: url.to_string(),
            source: format!("HTTP {}", response.status()).into(),
        });
    }

    let total_size = response.content_length().filter(|len| *len > 0);
    reporter.download_progress(0, total_size);

    let mut file = File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::DownloadFailed {
            url: url.to_string(),
            source: Box::new(e),
        })?;

        file.write_all(&chunk).await?;

        downloaded += chunk.len() as u64;
        reporter.download_progress(downloaded, total_size);
    }

    file.flush().await?;
    debug!("Downloaded {downloaded} bytes to {}", dest.display());

    Ok(downloaded)
}

/// Download a video on a dedicated runtime, blocking until it is written.
pub fn download_video(url: &str, dest: &Path, reporter: &dyn ProgressReporter) -> Result<u64> {
    let runtime = tokio::runtime::Runtime::new().map_err(|e| Error::Internal {
        message: format!("Failed to create async runtime: {e}"),
    })?;

    let client = Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()
        .map_err(|e| Error::Internal {
            message: format!("Failed to create HTTP client: {e}"),
        })?;

    runtime.block_on(download_file(&client, url, dest, reporter))
}
