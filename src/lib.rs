//! Tikloader library

pub mod app;
pub mod downloader;
pub mod extractor;
pub mod utils;

// Re-export main types for easier use
pub use app::{DownloadState, FetchState, OptionSelector, Session};
pub use downloader::{DownloadConfig, DownloadEngine, DownloadOutcome, DownloadProgress, DownloadStatus};
pub use extractor::{DownloadOption, Extractor, MediaFormat, TikwmExtractor, VideoInfo};
pub use utils::{AppSettings, TikloaderError};
