//! Asset retrieval with progress and a never-failing fallback

use crate::downloader::fallback::{FallbackOpener, Handoff, SystemOpener};
use crate::downloader::progress::{
    DownloadProgress, DownloadStatus, ProgressReporter, PROGRESS_HEADERS, PROGRESS_MATERIALIZED,
    PROGRESS_REQUESTED,
};
use crate::utils::config::AppSettings;
use crate::utils::error::TikloaderError;
use crate::utils::filename::sanitize_filename;
use crate::utils::paths::ensure_dir;
use anyhow::{anyhow, Result};
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Download configuration
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub output_dir: PathBuf,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub open_in_browser: bool,
}

impl DownloadConfig {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            output_dir: settings.download_location.clone(),
            user_agent: settings.user_agent.clone(),
            connect_timeout: settings.connect_timeout,
            open_in_browser: settings.open_in_browser,
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self::from_settings(&AppSettings::default())
    }
}

/// How a retrieval ended. Both variants are successes from the caller's view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum DownloadOutcome {
    /// Bytes were written to `path`
    Saved { path: PathBuf, bytes: u64 },
    /// Direct retrieval failed and the URL was handed off
    Fallback {
        url: String,
        handoff: Handoff,
        reason: String,
    },
}

impl DownloadOutcome {
    pub fn via_fallback(&self) -> bool {
        matches!(self, DownloadOutcome::Fallback { .. })
    }

    pub fn saved_path(&self) -> Option<&Path> {
        match self {
            DownloadOutcome::Saved { path, .. } => Some(path),
            DownloadOutcome::Fallback { .. } => None,
        }
    }
}

/// Single-stream download engine
pub struct DownloadEngine {
    client: Client,
    config: DownloadConfig,
    opener: Arc<dyn FallbackOpener>,
}

impl DownloadEngine {
    /// Create new download engine with configuration
    pub fn new(config: DownloadConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout)
            .build()?;
        let opener: Arc<dyn FallbackOpener> = Arc::new(SystemOpener::new(config.open_in_browser));

        Ok(Self {
            client,
            config,
            opener,
        })
    }

    /// Replace the fallback hand-off
    pub fn with_opener(mut self, opener: Arc<dyn FallbackOpener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Retrieve `url` into the output directory as `desired_filename`.
    ///
    /// The name is sanitized first; a name with nothing left after
    /// sanitizing is the only error. Any network or disk failure after that
    /// is absorbed by handing the URL to the fallback opener, and the
    /// progress sequence still ends at 100.
    pub async fn retrieve(
        &self,
        url: &str,
        desired_filename: &str,
        progress_tx: Option<mpsc::Sender<DownloadProgress>>,
    ) -> Result<DownloadOutcome, TikloaderError> {
        let filename = sanitize_filename(desired_filename);
        if filename.chars().all(|c| c == '.') {
            return Err(TikloaderError::InvalidFilename(desired_filename.to_string()));
        }

        let target = self.config.output_dir.join(&filename);
        let mut progress = ProgressReporter::new(progress_tx);

        match self.download_to(url, &target, &mut progress).await {
            Ok(bytes) => {
                progress.finish(DownloadStatus::Completed).await;
                info!("Saved {} bytes to {:?}", bytes, target);
                Ok(DownloadOutcome::Saved {
                    path: target,
                    bytes,
                })
            }
            Err(e) => {
                warn!("Direct retrieval failed ({}), handing URL off", e);
                let handoff = self.hand_off(url).await;
                progress.finish(DownloadStatus::HandedOff).await;
                Ok(DownloadOutcome::Fallback {
                    url: url.to_string(),
                    handoff,
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn download_to(
        &self,
        url: &str,
        target: &Path,
        progress: &mut ProgressReporter,
    ) -> Result<u64> {
        debug!("Retrieving asset: {}", url);
        progress
            .report(PROGRESS_REQUESTED, DownloadStatus::Downloading)
            .await;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {}", response.status()));
        }
        progress
            .report(PROGRESS_HEADERS, DownloadStatus::Downloading)
            .await;

        ensure_dir(&self.config.output_dir).await?;
        let part = part_path(target);

        let written = match stream_to_file(response, &part, progress).await {
            Ok(written) => written,
            Err(e) => {
                remove_part(&part).await;
                return Err(e);
            }
        };
        progress
            .report(PROGRESS_MATERIALIZED, DownloadStatus::Saving)
            .await;

        if let Err(e) = fs::rename(&part, target).await {
            remove_part(&part).await;
            return Err(e.into());
        }

        Ok(written)
    }

    async fn hand_off(&self, url: &str) -> Handoff {
        let opener = Arc::clone(&self.opener);
        let url = url.to_string();
        // Browser launchers may block while spawning
        match tokio::task::spawn_blocking(move || opener.hand_off(&url)).await {
            Ok(handoff) => handoff,
            Err(e) => {
                warn!("Fallback opener panicked: {}", e);
                Handoff::Printed
            }
        }
    }
}

/// Stream the response body into `path`, reporting byte progress
async fn stream_to_file(
    response: Response,
    path: &Path,
    progress: &mut ProgressReporter,
) -> Result<u64> {
    let total = response.content_length();
    let mut file = File::create(path).await?;
    let mut downloaded = 0u64;

    let mut stream = response.bytes_stream();
    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        progress.bytes(downloaded, total).await;
    }

    // Ensure file is flushed
    file.flush().await?;
    file.sync_all().await?;

    if let Some(expected) = total {
        if downloaded != expected {
            return Err(anyhow!(
                "Body ended early: {} of {} bytes",
                downloaded,
                expected
            ));
        }
    }

    Ok(downloaded)
}

fn part_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    target.with_file_name(name)
}

async fn remove_part(part: &Path) {
    if let Err(e) = fs::remove_file(part).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove partial file {:?}: {}", part, e);
        }
    }
}
