//! TikTok link recognition
//!
//! Pure string matching, no network. Used as a gate before fetching: an input
//! that matches none of the known shapes cannot proceed, but that is not an
//! error in itself.

use regex::Regex;
use std::sync::OnceLock;

/// Which link shape matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// `tiktok.com/@handle/video/<id>`
    Canonical,
    /// `vm.tiktok.com/<code>`, `vt.tiktok.com/<code>`, `tiktok.com/t/<code>`
    ShortLink,
    /// `m.tiktok.com/v/<id>`
    Mobile,
}

/// A recognized link and its captured identifier segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedUrl {
    pub kind: UrlKind,
    pub id: String,
}

fn patterns() -> &'static [(UrlKind, Regex)] {
    static R: OnceLock<Vec<(UrlKind, Regex)>> = OnceLock::new();
    R.get_or_init(|| {
        [
            (UrlKind::Canonical, r"tiktok\.com/@[A-Za-z0-9_.-]+/video/([0-9]+)"),
            (UrlKind::ShortLink, r"vm\.tiktok\.com/([A-Za-z0-9_]+)"),
            (UrlKind::ShortLink, r"vt\.tiktok\.com/([A-Za-z0-9_]+)"),
            (UrlKind::ShortLink, r"tiktok\.com/t/([A-Za-z0-9_]+)"),
            (UrlKind::Mobile, r"m\.tiktok\.com/v/([0-9]+)"),
        ]
        .into_iter()
        .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("valid TikTok link pattern")))
        .collect()
    })
}

/// Match `input` against the supported shapes in priority order.
///
/// ```
/// use tikloader::extractor::url::{recognize, UrlKind};
/// let hit = recognize("https://vm.tiktok.com/ZMabc123/").unwrap();
/// assert_eq!(hit.kind, UrlKind::ShortLink);
/// assert_eq!(hit.id, "ZMabc123");
/// assert!(recognize("https://example.com").is_none());
/// ```
pub fn recognize(input: &str) -> Option<RecognizedUrl> {
    patterns().iter().find_map(|(kind, re)| {
        re.captures(input).and_then(|caps| {
            caps.get(1).map(|id| RecognizedUrl {
                kind: *kind,
                id: id.as_str().to_string(),
            })
        })
    })
}

/// Identifier segment of a recognized link
pub fn extract_video_id(input: &str) -> Option<String> {
    recognize(input).map(|r| r.id)
}

/// Whether `input` is a supported link
pub fn is_supported(input: &str) -> bool {
    recognize(input).is_some()
}
