//! Session orchestration
//!
//! A [`Session`] owns the latest fetched metadata and the transient
//! loading/error/progress state. Every operation takes `&mut self`, so one
//! session can never run two fetches or downloads at once.

use crate::downloader::{DownloadEngine, DownloadOutcome, DownloadProgress};
use crate::extractor::{DownloadOption, Extractor, VideoInfo};
use crate::utils::error::TikloaderError;
use crate::utils::filename::{build_download_filename, timestamp_token};
use anyhow::Result;
use std::fmt;
use std::str::FromStr;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Metadata lookup state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Ready(VideoInfo),
    Failed(String),
}

/// Asset retrieval state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DownloadState {
    #[default]
    Idle,
    Downloading,
    Finished(DownloadOutcome),
    Failed(String),
}

/// Which download option to take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionSelector {
    /// Highest priority option
    #[default]
    First,
    /// 1-based position in the option list
    Index(usize),
    Hd,
    Standard,
    Watermarked,
    Audio,
}

impl OptionSelector {
    pub fn select<'a>(&self, downloads: &'a [DownloadOption]) -> Option<&'a DownloadOption> {
        match self {
            OptionSelector::First => downloads.first(),
            OptionSelector::Index(n) => n.checked_sub(1).and_then(|i| downloads.get(i)),
            OptionSelector::Hd => downloads.iter().find(|d| d.quality.starts_with("HD")),
            OptionSelector::Standard => downloads.iter().find(|d| d.quality.starts_with("Standard")),
            OptionSelector::Watermarked => downloads.iter().find(|d| d.has_watermark),
            OptionSelector::Audio => downloads.iter().find(|d| d.format.is_audio()),
        }
    }
}

impl FromStr for OptionSelector {
    type Err = TikloaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "best" | "first" => Ok(OptionSelector::First),
            "hd" => Ok(OptionSelector::Hd),
            "sd" | "standard" => Ok(OptionSelector::Standard),
            "wm" | "watermark" | "original" => Ok(OptionSelector::Watermarked),
            "audio" | "mp3" => Ok(OptionSelector::Audio),
            other => other
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(OptionSelector::Index)
                .ok_or_else(|| TikloaderError::NoMatchingOption(s.clone())),
        }
    }
}

impl fmt::Display for OptionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSelector::First => f.write_str("best"),
            OptionSelector::Index(n) => write!(f, "#{}", n),
            OptionSelector::Hd => f.write_str("hd"),
            OptionSelector::Standard => f.write_str("standard"),
            OptionSelector::Watermarked => f.write_str("watermark"),
            OptionSelector::Audio => f.write_str("audio"),
        }
    }
}

/// One user's fetch-then-download flow
pub struct Session<E: Extractor> {
    extractor: E,
    engine: DownloadEngine,
    fetch: FetchState,
    download: DownloadState,
}

impl<E: Extractor> Session<E> {
    pub fn new(extractor: E, engine: DownloadEngine) -> Self {
        Self {
            extractor,
            engine,
            fetch: FetchState::Idle,
            download: DownloadState::Idle,
        }
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    pub fn download_state(&self) -> &DownloadState {
        &self.download
    }

    /// Currently loaded metadata, if the last fetch succeeded
    pub fn video(&self) -> Option<&VideoInfo> {
        match &self.fetch {
            FetchState::Ready(info) => Some(info),
            _ => None,
        }
    }

    /// Discard any previous result and look up `url`
    pub async fn fetch(&mut self, url: &str) -> Result<&VideoInfo> {
        self.reset();
        let url = url.trim();
        if url.is_empty() {
            let err = TikloaderError::InvalidUrl("empty input".to_string());
            self.fetch = FetchState::Failed(err.to_string());
            return Err(err.into());
        }

        self.fetch = FetchState::Loading;
        debug!("Fetching with extractor {}", self.extractor.id());

        match self.extractor.extract_info(url).await {
            Ok(info) => {
                info!("Loaded \"{}\" ({} options)", info.title, info.downloads.len());
                self.fetch = FetchState::Ready(info);
            }
            Err(e) => {
                warn!("Fetch failed: {}", e);
                self.fetch = FetchState::Failed(e.to_string());
                return Err(e);
            }
        }

        self.video().ok_or_else(|| TikloaderError::NoVideoLoaded.into())
    }

    /// Download the option chosen by `selector` from the loaded video
    pub async fn download(
        &mut self,
        selector: OptionSelector,
        progress_tx: Option<mpsc::Sender<DownloadProgress>>,
    ) -> Result<DownloadOutcome> {
        let (option, filename) = {
            let info = self.video().ok_or(TikloaderError::NoVideoLoaded)?;
            let option = selector
                .select(&info.downloads)
                .ok_or_else(|| TikloaderError::NoMatchingOption(selector.to_string()))?
                .clone();
            let filename = build_download_filename(info, &option, &timestamp_token());
            (option, filename)
        };

        info!("Downloading {} as {}", option.quality, filename);
        self.download = DownloadState::Downloading;

        match self.engine.retrieve(&option.url, &filename, progress_tx).await {
            Ok(outcome) => {
                self.download = DownloadState::Finished(outcome.clone());
                Ok(outcome)
            }
            Err(e) => {
                self.download = DownloadState::Failed(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Clear all transient state
    pub fn reset(&mut self) {
        self.fetch = FetchState::Idle;
        self.download = DownloadState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::{DownloadConfig, FallbackOpener, Handoff};
    use crate::extractor::MediaFormat;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct CannedExtractor {
        result: std::result::Result<VideoInfo, String>,
    }

    #[async_trait]
    impl Extractor for CannedExtractor {
        fn id(&self) -> &'static str {
            "canned"
        }

        fn supports(&self, _url: &str) -> bool {
            true
        }

        async fn extract_info(&self, _url: &str) -> Result<VideoInfo> {
            match &self.result {
                Ok(info) => Ok(info.clone()),
                Err(msg) => Err(TikloaderError::Upstream(msg.clone()).into()),
            }
        }
    }

    struct SilentOpener;

    impl FallbackOpener for SilentOpener {
        fn hand_off(&self, _url: &str) -> Handoff {
            Handoff::Printed
        }
    }

    fn option(quality: &str, format: MediaFormat, watermark: bool) -> DownloadOption {
        DownloadOption {
            quality: quality.to_string(),
            format,
            url: "http://127.0.0.1:1/asset".to_string(),
            size: "N/A".to_string(),
            has_watermark: watermark,
        }
    }

    fn sample_video() -> VideoInfo {
        VideoInfo {
            id: "42".to_string(),
            title: "Sample".to_string(),
            author: "Jane".to_string(),
            downloads: vec![
                option("HD (1080p)", MediaFormat::Mp4, false),
                option("Original (with watermark)", MediaFormat::Mp4, true),
                option("Audio Only", MediaFormat::Mp3, false),
            ],
            ..Default::default()
        }
    }

    fn session(result: std::result::Result<VideoInfo, String>, dir: &std::path::Path) -> Session<CannedExtractor> {
        let config = DownloadConfig {
            output_dir: dir.to_path_buf(),
            open_in_browser: false,
            ..Default::default()
        };
        let engine = DownloadEngine::new(config)
            .unwrap()
            .with_opener(Arc::new(SilentOpener));
        Session::new(CannedExtractor { result }, engine)
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!("HD".parse::<OptionSelector>().unwrap(), OptionSelector::Hd);
        assert_eq!("sd".parse::<OptionSelector>().unwrap(), OptionSelector::Standard);
        assert_eq!("mp3".parse::<OptionSelector>().unwrap(), OptionSelector::Audio);
        assert_eq!("2".parse::<OptionSelector>().unwrap(), OptionSelector::Index(2));
        assert!("0".parse::<OptionSelector>().is_err());
        assert!("ultra".parse::<OptionSelector>().is_err());
    }

    #[test]
    fn test_selector_picks_option() {
        let video = sample_video();
        let d = &video.downloads;
        assert_eq!(OptionSelector::First.select(d).unwrap().quality, "HD (1080p)");
        assert_eq!(OptionSelector::Index(3).select(d).unwrap().format, MediaFormat::Mp3);
        assert!(OptionSelector::Index(4).select(d).is_none());
        assert!(OptionSelector::Watermarked.select(d).unwrap().has_watermark);
        assert!(OptionSelector::Standard.select(d).is_none());
        assert!(OptionSelector::First.select(&[]).is_none());
    }

    #[tokio::test]
    async fn test_fetch_success_then_reset() {
        let temp = tempfile::tempdir().unwrap();
        let mut s = session(Ok(sample_video()), temp.path());
        assert_eq!(s.fetch_state(), &FetchState::Idle);

        let info = s.fetch("https://www.tiktok.com/@jane/video/42").await.unwrap();
        assert_eq!(info.id, "42");
        assert!(matches!(s.fetch_state(), FetchState::Ready(_)));

        s.reset();
        assert_eq!(s.fetch_state(), &FetchState::Idle);
        assert!(s.video().is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_records_message() {
        let temp = tempfile::tempdir().unwrap();
        let mut s = session(Err("rate limited".to_string()), temp.path());

        let err = s.fetch("https://vm.tiktok.com/ZMabc/").await.unwrap_err();
        assert_eq!(err.to_string(), "rate limited");
        assert_eq!(s.fetch_state(), &FetchState::Failed("rate limited".to_string()));
    }

    #[tokio::test]
    async fn test_empty_input_fails_without_calling_upstream() {
        let temp = tempfile::tempdir().unwrap();
        let mut s = session(Ok(sample_video()), temp.path());
        assert!(s.fetch("   ").await.is_err());
        assert!(matches!(s.fetch_state(), FetchState::Failed(_)));
    }

    #[tokio::test]
    async fn test_download_requires_loaded_video() {
        let temp = tempfile::tempdir().unwrap();
        let mut s = session(Ok(sample_video()), temp.path());
        let err = s.download(OptionSelector::First, None).await.unwrap_err();
        assert!(err.to_string().contains("No video loaded"));
        assert_eq!(s.download_state(), &DownloadState::Idle);
    }

    #[tokio::test]
    async fn test_download_falls_back_and_records_outcome() {
        let temp = tempfile::tempdir().unwrap();
        let mut s = session(Ok(sample_video()), temp.path());
        s.fetch("https://www.tiktok.com/@jane/video/42").await.unwrap();

        let outcome = s.download(OptionSelector::Audio, None).await.unwrap();
        assert!(outcome.via_fallback());
        assert!(matches!(s.download_state(), DownloadState::Finished(o) if o.via_fallback()));
    }

    #[tokio::test]
    async fn test_download_with_no_options_is_error() {
        let temp = tempfile::tempdir().unwrap();
        let mut s = session(Ok(VideoInfo::default()), temp.path());
        s.fetch("https://www.tiktok.com/@jane/video/42").await.unwrap();

        let err = s.download(OptionSelector::First, None).await.unwrap_err();
        assert!(err.to_string().contains("No download option"));
    }

    #[tokio::test]
    async fn test_new_fetch_discards_previous_result() {
        let temp = tempfile::tempdir().unwrap();
        let mut s = session(Ok(sample_video()), temp.path());
        s.fetch("https://www.tiktok.com/@jane/video/42").await.unwrap();
        s.download(OptionSelector::First, None).await.unwrap();

        s.fetch("https://www.tiktok.com/@jane/video/42").await.unwrap();
        assert_eq!(s.download_state(), &DownloadState::Idle);
    }
}
