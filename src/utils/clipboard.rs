//! Clipboard functionality

use crate::utils::error::TikloaderError;
use arboard::Clipboard;

/// Get clipboard content, trimmed
pub fn get_clipboard_content() -> Result<String, TikloaderError> {
    let mut clipboard = Clipboard::new()
        .map_err(|e| TikloaderError::Clipboard(format!("Failed to access clipboard: {}", e)))?;

    let text = clipboard
        .get_text()
        .map_err(|e| TikloaderError::Clipboard(format!("Failed to read clipboard: {}", e)))?;

    Ok(text.trim().to_string())
}
