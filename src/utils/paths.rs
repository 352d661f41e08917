//! Download directory resolution
//!
//! Always resolves to an absolute, platform-standard location so a binary
//! launched from a desktop shortcut (cwd `/`) still saves next to the user's
//! other downloads.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Get the user's downloads directory.
///
/// Falls back to `~/Downloads`, then the system temp dir.
pub fn get_downloads_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| {
            warn!("Could not determine Downloads directory, using temp dir");
            std::env::temp_dir()
        })
}

/// Returns the default download directory: `~/Downloads/tikloader`
pub fn default_download_dir() -> PathBuf {
    get_downloads_dir().join("tikloader")
}

/// Create `dir` and its parents if needed
pub async fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    debug!("Download directory ready: {:?}", dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downloads_dir_is_not_relative() {
        let path = get_downloads_dir();
        assert!(path.is_absolute(), "Downloads dir must be absolute path");
    }

    #[test]
    fn test_default_download_dir_naming() {
        let dir = default_download_dir();
        assert_eq!(dir.file_name().and_then(|n| n.to_str()), Some("tikloader"));
    }

    #[tokio::test]
    async fn test_ensure_dir_creates_nested() {
        let temp = tempfile::tempdir().expect("temp dir");
        let nested = temp.path().join("a").join("b");
        ensure_dir(&nested).await.expect("create");
        assert!(nested.is_dir());
    }
}
