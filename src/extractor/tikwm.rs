//! tikwm.com API client
//!
//! One form-encoded POST per lookup. The API answers `{ code, msg, data }`;
//! `code == 0` means success and `data` carries the raw video record, which is
//! normalized into [`VideoInfo`] here.

use crate::extractor::models::{DownloadOption, MediaFormat, VideoInfo, SIZE_UNKNOWN};
use crate::extractor::traits::Extractor;
use crate::extractor::url::is_supported;
use crate::utils::config::AppSettings;
use crate::utils::error::TikloaderError;
use crate::utils::format::format_bytes;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, error, info};

const DEFAULT_TITLE: &str = "TikTok Video";
const UNKNOWN_AUTHOR: &str = "Unknown";

/// Top-level API envelope
#[derive(Debug, Deserialize)]
pub struct TikwmResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
    /// Kept raw until `code` is checked; failures often send `data: []`
    #[serde(default)]
    pub data: Option<Value>,
}

/// Raw video record as sent by the API
#[derive(Debug, Default, Deserialize)]
pub struct TikwmVideo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<TikwmAuthor>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub origin_cover: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub duration: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub play_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub digg_count: Option<u64>,
    #[serde(default)]
    pub hdplay: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub hd_size: Option<u64>,
    #[serde(default)]
    pub play: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub size: Option<u64>,
    #[serde(default)]
    pub wmplay: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub wm_size: Option<u64>,
    #[serde(default)]
    pub music: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TikwmAuthor {
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub unique_id: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Accept integers, floats and numeric strings; anything else is absent
fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

/// Accept strings and numbers as text
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

/// Non-empty string field, mirroring the API's "truthy" semantics
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Map a raw record into the normalized model.
///
/// Download options are emitted in fixed priority order, each only when its
/// URL field is present: HD, standard, watermarked, audio.
pub fn normalize(video: TikwmVideo) -> VideoInfo {
    let mut downloads = Vec::new();

    // HD version without watermark
    if let Some(url) = present(&video.hdplay) {
        downloads.push(DownloadOption {
            quality: "HD (1080p)".to_string(),
            format: MediaFormat::Mp4,
            url: url.to_string(),
            size: format_bytes(video.hd_size.unwrap_or(0)),
            has_watermark: false,
        });
    }

    // Standard version without watermark
    if let Some(url) = present(&video.play) {
        downloads.push(DownloadOption {
            quality: "Standard (720p)".to_string(),
            format: MediaFormat::Mp4,
            url: url.to_string(),
            size: format_bytes(video.size.unwrap_or(0)),
            has_watermark: false,
        });
    }

    if let Some(url) = present(&video.wmplay) {
        downloads.push(DownloadOption {
            quality: "Original (with watermark)".to_string(),
            format: MediaFormat::Mp4,
            url: url.to_string(),
            size: format_bytes(video.wm_size.unwrap_or(0)),
            has_watermark: true,
        });
    }

    // Audio size is never computed upstream
    if let Some(url) = present(&video.music) {
        downloads.push(DownloadOption {
            quality: "Audio Only".to_string(),
            format: MediaFormat::Mp3,
            url: url.to_string(),
            size: SIZE_UNKNOWN.to_string(),
            has_watermark: false,
        });
    }

    let author = video.author.unwrap_or_default();

    VideoInfo {
        id: video.id.unwrap_or_default(),
        title: present(&video.title).unwrap_or(DEFAULT_TITLE).to_string(),
        author: present(&author.nickname)
            .or_else(|| present(&author.unique_id))
            .unwrap_or(UNKNOWN_AUTHOR)
            .to_string(),
        author_avatar: present(&author.avatar).unwrap_or_default().to_string(),
        thumbnail: present(&video.cover)
            .or_else(|| present(&video.origin_cover))
            .unwrap_or_default()
            .to_string(),
        duration: video.duration.unwrap_or(0),
        views: video.play_count.unwrap_or(0),
        likes: video.digg_count.unwrap_or(0),
        downloads,
    }
}

/// Parse an API body, applying the envelope's success/failure rules
pub fn parse_response(body: &str) -> Result<VideoInfo, TikloaderError> {
    let envelope: TikwmResponse = serde_json::from_str(body)?;

    if envelope.code != Some(0) {
        return Err(TikloaderError::upstream(envelope.msg.as_deref()));
    }

    let data = envelope
        .data
        .ok_or_else(|| TikloaderError::upstream(None))?;
    let video: TikwmVideo = serde_json::from_value(data)?;

    Ok(normalize(video))
}

/// Metadata extractor backed by the tikwm API
pub struct TikwmExtractor {
    client: Client,
    endpoint: String,
    api_timeout: std::time::Duration,
}

impl TikwmExtractor {
    /// Create an extractor from settings
    pub fn new(settings: &AppSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .connect_timeout(settings.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.api_endpoint.clone(),
            api_timeout: settings.api_timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch and normalize metadata for `url`
    pub async fn fetch(&self, url: &str) -> Result<VideoInfo, TikloaderError> {
        debug!("Requesting video info for URL: {}", url);

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.api_timeout)
            .form(&[("url", url), ("hd", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            error!("Metadata request failed with HTTP {}", response.status());
            return Err(TikloaderError::FetchFailed);
        }

        let body = response.text().await?;
        let info = parse_response(&body)?;

        info!(
            "Fetched video {} by {} with {} download option(s)",
            info.id,
            info.author,
            info.downloads.len()
        );
        Ok(info)
    }
}

#[async_trait]
impl Extractor for TikwmExtractor {
    fn id(&self) -> &'static str {
        "tikwm"
    }

    fn supports(&self, url: &str) -> bool {
        is_supported(url)
    }

    async fn extract_info(&self, url: &str) -> Result<VideoInfo> {
        match self.fetch(url).await {
            Ok(info) => Ok(info),
            Err(e) => {
                error!("Error fetching video: {}", e);
                Err(e.into())
            }
        }
    }
}
