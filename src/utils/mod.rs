//! Utility modules for error handling, configuration and naming

pub mod clipboard;
pub mod config;
pub mod error;
pub mod filename;
pub mod format;
pub mod paths;

// Re-export for convenience
pub use config::AppSettings;
pub use error::TikloaderError;
pub use filename::{build_download_filename, sanitize_filename};
pub use format::{format_bytes, format_duration, format_number};
pub use paths::{default_download_dir, get_downloads_dir};
