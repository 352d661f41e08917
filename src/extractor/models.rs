//! Data structures for video information

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size shown when a variant's byte count is never computed
pub const SIZE_UNKNOWN: &str = "N/A";

/// Normalized video metadata, rebuilt from scratch on every fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    pub author: String,
    pub author_avatar: String,
    pub thumbnail: String,
    pub duration: u64,
    pub views: u64,
    pub likes: u64,
    /// Priority order: best quality without watermark first. May be empty.
    pub downloads: Vec<DownloadOption>,
}

/// One downloadable variant of a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadOption {
    pub quality: String,
    pub format: MediaFormat,
    /// Time-limited direct URL issued by upstream
    pub url: String,
    pub size: String,
    pub has_watermark: bool,
}

/// Media container of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    Mp4,
    Mp3,
}

impl MediaFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            MediaFormat::Mp4 => "mp4",
            MediaFormat::Mp3 => "mp3",
        }
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, MediaFormat::Mp3)
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.extension())
    }
}

impl VideoInfo {
    pub fn has_downloads(&self) -> bool {
        !self.downloads.is_empty()
    }
}
