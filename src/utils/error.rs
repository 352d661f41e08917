//! Error handling for tikloader

use thiserror::Error;

/// Generic message when the API transport itself reports failure
pub const FETCH_FAILED: &str = "Failed to fetch video info";

/// Generic message when upstream reports failure without a reason
pub const PROCESS_FAILED: &str = "Failed to process video";

/// Main error type for tikloader
#[derive(Debug, Error)]
pub enum TikloaderError {
    /// Non-success HTTP status from the metadata endpoint
    #[error("{}", FETCH_FAILED)]
    FetchFailed,

    /// Upstream answered but reported a failure; carries its message verbatim
    #[error("{0}")]
    Upstream(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    #[error("No video loaded")]
    NoVideoLoaded,

    #[error("No download option matches {0:?}")]
    NoMatchingOption(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl TikloaderError {
    /// Upstream failure; a missing or empty reason gets the generic message,
    /// anything else is kept byte for byte
    pub fn upstream(msg: Option<&str>) -> Self {
        match msg {
            Some(m) if !m.is_empty() => TikloaderError::Upstream(m.to_string()),
            _ => TikloaderError::Upstream(PROCESS_FAILED.to_string()),
        }
    }
}
