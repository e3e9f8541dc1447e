#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Dataset download for the collision dashboard.
//!
//! Fetches the collision dataset file (Parquet or CSV) over HTTP into a
//! local cache path, skipping the download entirely when the file is
//! already present. The dataset is static per deployment, so there is no
//! freshness check beyond existence.

use std::path::Path;

use futures::StreamExt as _;
use tokio::io::AsyncWriteExt as _;

/// Progress is logged once per this many downloaded bytes.
const PROGRESS_LOG_STEP: u64 = 50 * 1024 * 1024;

/// Errors from dataset download operations.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Non-success HTTP status.
    #[error("HTTP {status} for {url}")]
    HttpStatus {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// I/O error writing to disk.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

fn io_error(path: &Path) -> impl Fn(std::io::Error) -> DownloadError + '_ {
    move |source| DownloadError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Ensures the dataset file exists locally, downloading it if absent.
///
/// Returns the number of bytes downloaded, or `0` when the cached file
/// was used.
///
/// # Errors
///
/// Returns [`DownloadError`] if the download or the local write fails.
pub async fn ensure_dataset(url: &str, path: &Path) -> Result<u64, DownloadError> {
    if path.exists() {
        log::info!("Using cached dataset at {}", path.display());
        return Ok(0);
    }
    download_file(url, path).await
}

/// Downloads a file from a URL to a local path, streaming the body to
/// disk so the dataset never has to fit in memory.
///
/// The body lands in a `.part` file that is renamed into place only
/// after the stream completes, so an interrupted download is never
/// mistaken for a cached dataset.
///
/// # Errors
///
/// Returns an error if the HTTP request fails, the response is not
/// successful, or the local file cannot be written.
pub async fn download_file(url: &str, dest: &Path) -> Result<u64, DownloadError> {
    log::info!("Downloading dataset from {url} to {}", dest.display());

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(io_error(parent))?;
    }

    let client = reqwest::Client::builder()
        .user_agent("collision-dash-ingest/0.1")
        .build()
        .map_err(DownloadError::Http)?;

    let response = client.get(url).send().await.map_err(DownloadError::Http)?;
    if !response.status().is_success() {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let part_path = dest.with_extension("part");
    let downloaded = stream_to_file(response, &part_path).await?;

    tokio::fs::rename(&part_path, dest)
        .await
        .map_err(io_error(dest))?;

    log::info!("Download complete: {}", format_mb(downloaded));
    Ok(downloaded)
}

/// Writes the response body to `path`, logging progress along the way.
async fn stream_to_file(response: reqwest::Response, path: &Path) -> Result<u64, DownloadError> {
    let total_size = response.content_length();
    if let Some(size) = total_size {
        log::info!("Dataset size: {}", format_mb(size));
    }

    let mut file = tokio::fs::File::create(path).await.map_err(io_error(path))?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;
    let mut next_log = PROGRESS_LOG_STEP;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(DownloadError::Http)?;
        file.write_all(&chunk).await.map_err(io_error(path))?;
        downloaded += chunk.len() as u64;

        if downloaded >= next_log {
            next_log += PROGRESS_LOG_STEP;
            match total_size {
                Some(total) if total > 0 => {
                    log::info!(
                        "Downloaded {} ({}%)",
                        format_mb(downloaded),
                        downloaded * 100 / total
                    );
                }
                _ => log::info!("Downloaded {}", format_mb(downloaded)),
            }
        }
    }

    file.flush().await.map_err(io_error(path))?;
    Ok(downloaded)
}

fn format_mb(bytes: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let mb = bytes as f64 / 1_048_576.0;
    format!("{mb:.1} MB")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn megabytes_format_with_one_decimal() {
        assert_eq!(format_mb(0), "0.0 MB");
        assert_eq!(format_mb(1_048_576), "1.0 MB");
        assert_eq!(format_mb(157_286_400), "150.0 MB");
    }

    #[tokio::test]
    async fn cached_dataset_skips_download() {
        let path = std::env::temp_dir().join("collision_dash_cached.parquet");
        std::fs::write(&path, b"parquet-bytes").unwrap();

        // The URL is unreachable on purpose; the cached file short-circuits.
        let downloaded = ensure_dataset("http://127.0.0.1:1/never", &path)
            .await
            .unwrap();
        assert_eq!(downloaded, 0);
    }

    #[tokio::test]
    async fn unreachable_url_without_cache_is_an_error() {
        let path = std::env::temp_dir().join("collision_dash_missing.parquet");
        let _ = std::fs::remove_file(&path);

        let err = ensure_dataset("http://127.0.0.1:1/never", &path)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Http(_)));
    }
}
