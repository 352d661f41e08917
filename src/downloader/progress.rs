//! Progress tracking for downloads
//!
//! Progress is a coarse percentage built from fixed checkpoints, refined with
//! real byte counts while the body streams if the server sends a length.
//! Whatever the path, reported percentages never decrease and always end at 100.

use tokio::sync::mpsc;
use tracing::warn;

/// Request sent
pub const PROGRESS_REQUESTED: u8 = 10;
/// Response headers received
pub const PROGRESS_HEADERS: u8 = 50;
/// Body fully written to disk
pub const PROGRESS_MATERIALIZED: u8 = 90;
/// Saved, or handed off to the fallback
pub const PROGRESS_DONE: u8 = 100;

/// Progress snapshot sent to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadProgress {
    pub percent: u8,
    pub downloaded_bytes: u64,
    /// From `Content-Length`, when the server sends one
    pub total_bytes: Option<u64>,
    pub status: DownloadStatus,
}

impl DownloadProgress {
    /// Create a new progress snapshot
    pub fn new(total_bytes: Option<u64>) -> Self {
        Self {
            percent: 0,
            downloaded_bytes: 0,
            total_bytes,
            status: DownloadStatus::Initializing,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.percent >= PROGRESS_DONE
    }
}

/// Download status
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DownloadStatus {
    #[default]
    Initializing,
    Downloading,
    Saving,
    Completed,
    /// Direct retrieval failed; the URL was handed to the fallback
    HandedOff,
}

/// Monotonic sender wrapper around an optional progress channel
pub struct ProgressReporter {
    tx: Option<mpsc::Sender<DownloadProgress>>,
    current: DownloadProgress,
}

impl ProgressReporter {
    pub fn new(tx: Option<mpsc::Sender<DownloadProgress>>) -> Self {
        Self {
            tx,
            current: DownloadProgress::new(None),
        }
    }

    /// Advance to `percent` (never backwards) and notify the receiver
    pub async fn report(&mut self, percent: u8, status: DownloadStatus) {
        let percent = percent.clamp(self.current.percent, PROGRESS_DONE);
        if percent == self.current.percent && status == self.current.status {
            return;
        }
        self.current.percent = percent;
        self.current.status = status;
        self.send().await;
    }

    /// Record streamed bytes, interpolating between the header and
    /// materialized checkpoints when the total is known.
    pub async fn bytes(&mut self, downloaded: u64, total: Option<u64>) {
        self.current.downloaded_bytes = downloaded;
        self.current.total_bytes = total;

        let percent = match total {
            Some(total) if total > 0 => {
                let span = u64::from(PROGRESS_MATERIALIZED - PROGRESS_HEADERS);
                let step = (downloaded.min(total) * span / total) as u8;
                (PROGRESS_HEADERS + step).min(PROGRESS_MATERIALIZED - 1)
            }
            _ => return,
        };

        if percent > self.current.percent {
            self.current.percent = percent;
            self.send().await;
        }
    }

    /// Terminate the sequence at 100
    pub async fn finish(&mut self, status: DownloadStatus) {
        self.report(PROGRESS_DONE, status).await;
    }

    async fn send(&self) {
        if let Some(tx) = &self.tx {
            if let Err(e) = tx.send(self.current.clone()).await {
                warn!("Failed to send progress update: {}", e);
            }
        }
    }
}
