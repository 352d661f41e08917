//! Download engine module

pub mod engine;
pub mod fallback;
pub mod progress;

// Re-export for convenience
pub use engine::{DownloadConfig, DownloadEngine, DownloadOutcome};
pub use fallback::{FallbackOpener, Handoff, SystemOpener};
pub use progress::{DownloadProgress, DownloadStatus};
