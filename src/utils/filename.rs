//! Filename derivation for saved media
//!
//! Two layers: [`build_download_filename`] composes a descriptive, unique name
//! from video metadata, and [`sanitize_filename`] constrains any name to the
//! `[A-Za-z0-9_\s.-]` alphabet the save surface accepts.

use crate::extractor::{DownloadOption, VideoInfo};

/// Maximum length of a saved filename, extension included
pub const MAX_FILENAME_LEN: usize = 100;

/// Longest suffix still treated as an extension when truncating
const MAX_EXTENSION_LEN: usize = 10;

const TITLE_MAX_CHARS: usize = 50;

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whitespace as browsers define `\s`: Unicode White_Space without NEL,
/// plus the byte order mark.
fn is_space(c: char) -> bool {
    c != '\u{85}' && (c.is_whitespace() || c == '\u{feff}')
}

/// Sanitizes a filename for the local save surface.
///
/// - Removes every character outside ASCII word characters, whitespace, `.` and `-`
/// - Collapses each whitespace run into a single `_`
/// - Limits the result to 100 characters, keeping a short extension intact
///
/// # Examples
/// ```
/// use tikloader::utils::filename::sanitize_filename;
/// assert_eq!(sanitize_filename("Jane's Video! #1.mp4"), "Janes_Video_1.mp4");
/// assert_eq!(sanitize_filename("a   b.mp3"), "a_b.mp3");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for c in name.chars() {
        if is_space(c) {
            if !in_whitespace {
                sanitized.push('_');
            }
            in_whitespace = true;
            continue;
        }
        // Dropped characters do not split a whitespace run.
        if is_word_char(c) || c == '.' || c == '-' {
            in_whitespace = false;
            sanitized.push(c);
        }
    }

    // Only ASCII survives, so byte length equals char length from here on.
    if sanitized.len() > MAX_FILENAME_LEN {
        if let Some(dot_pos) = sanitized.rfind('.') {
            let extension = &sanitized[dot_pos..];
            if extension.len() < MAX_EXTENSION_LEN && dot_pos > 0 {
                let name_part = &sanitized[..MAX_FILENAME_LEN - extension.len()];
                return format!("{}{}", name_part, extension);
            }
        }
        sanitized.truncate(MAX_FILENAME_LEN);
    }

    sanitized
}

/// Keep word characters and whitespace only, then trim
fn strip_to_words(value: &str) -> String {
    value
        .chars()
        .filter(|c| is_word_char(*c) || is_space(*c))
        .collect::<String>()
        .trim_matches(is_space)
        .to_string()
}

/// Compose `<author>_<title>_<quality>_<token>.<ext>` for a chosen option.
///
/// `token` makes repeated downloads of the same video and quality distinct;
/// callers normally pass a millisecond timestamp.
pub fn build_download_filename(info: &VideoInfo, option: &DownloadOption, token: &str) -> String {
    let author = strip_to_words(&info.author);
    let author = if author.is_empty() { "TikTok".to_string() } else { author };

    let title: String = strip_to_words(&info.title)
        .chars()
        .take(TITLE_MAX_CHARS)
        .collect();
    let title = title.trim_end_matches(is_space);
    let title = if title.is_empty() { "Video" } else { title };

    let quality_tag: String = option.quality.chars().filter(|c| is_word_char(*c)).collect();

    format!(
        "{}_{}_{}_{}.{}",
        author,
        title,
        quality_tag,
        token,
        option.format.extension()
    )
}

/// Millisecond timestamp used as the default uniqueness token
pub fn timestamp_token() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
