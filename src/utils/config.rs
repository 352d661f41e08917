//! Application configuration
//!
//! Settings live in memory only; the CLI overrides individual fields.

use crate::utils::paths::default_download_dir;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Public tikwm endpoint that performs the actual TikTok extraction
pub const DEFAULT_API_ENDPOINT: &str = "https://www.tikwm.com/api/";

/// Browser-like agent; the API and CDN reject some non-browser agents
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Download location
    pub download_location: PathBuf,

    /// Metadata API endpoint
    pub api_endpoint: String,

    /// User agent for API and asset requests
    pub user_agent: String,

    /// Connect timeout for every request
    pub connect_timeout: Duration,

    /// Overall timeout for the metadata request (asset bodies are unbounded)
    pub api_timeout: Duration,

    /// Hand the asset URL to the system browser when retrieval fails
    pub open_in_browser: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            download_location: default_download_dir(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(30),
            api_timeout: Duration::from_secs(30),
            open_in_browser: true,
        }
    }
}

impl AppSettings {
    /// Settings pointing at another endpoint, used against local test servers
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            api_endpoint: endpoint.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppSettings::default();
        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
        assert!(config.connect_timeout > Duration::ZERO);
        assert!(config.open_in_browser);
        assert!(!config.user_agent.is_empty());
    }

    #[test]
    fn test_with_endpoint_keeps_other_defaults() {
        let config = AppSettings::with_endpoint("http://127.0.0.1:9/api/");
        assert_eq!(config.api_endpoint, "http://127.0.0.1:9/api/");
        assert_eq!(config.download_location, default_download_dir());
    }
}
