use crate::extractor::models::VideoInfo;
use anyhow::Result;
use async_trait::async_trait;

/// Core trait for metadata extractors
///
/// Isolates the session from the specific upstream service, so tests and
/// alternative APIs can stand in for tikwm.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Returns a unique identifier for this extractor (e.g., "tikwm")
    fn id(&self) -> &'static str;

    /// Checks if this extractor recognizes the given URL
    ///
    /// Advisory only: `extract_info` may still be called with other input and
    /// fail naturally against upstream.
    fn supports(&self, url: &str) -> bool;

    /// Extracts video information
    async fn extract_info(&self, url: &str) -> Result<VideoInfo>;
}
