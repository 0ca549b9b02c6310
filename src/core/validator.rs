//! TikTok URL recognition

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Result, TikdlError};
use crate::types::{InputState, UrlShape};

/// Recognized link shapes, tried in order. Each is anchored at the start
/// of the input; anything after the matched prefix is ignored.
static PATTERNS: LazyLock<Vec<(UrlShape, Regex)>> = LazyLock::new(|| {
    [
        (
            UrlShape::Video,
            r"^https?://(?:www\.)?tiktok\.com/@[A-Za-z0-9_.-]+/video/([0-9]+)",
        ),
        (UrlShape::ShortLink, r"^https?://(?:vm|vt)\.tiktok\.com/[A-Za-z0-9_]+"),
        (UrlShape::ShareLink, r"^https?://(?:www\.)?tiktok\.com/t/[A-Za-z0-9_]+"),
        (UrlShape::Mobile, r"^https?://(?:m\.)?tiktok\.com/v/([0-9]+)"),
    ]
    .into_iter()
    .map(|(shape, pattern)| (shape, Regex::new(pattern).expect("Invalid regex")))
    .collect()
});

/// Whether `input` starts with one of the recognized TikTok link shapes
pub fn is_valid_url(input: &str) -> bool {
    classify_url(input).is_some()
}

/// Name the link shape `input` matches, if any
pub fn classify_url(input: &str) -> Option<UrlShape> {
    PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(input))
        .map(|(shape, _)| *shape)
}

/// Numeric video id, for the shapes that carry one in the path
pub fn extract_video_id(input: &str) -> Option<String> {
    PATTERNS
        .iter()
        .find_map(|(_, re)| re.captures(input)?.get(1))
        .map(|m| m.as_str().to_string())
}

/// Submit-time check: trims the raw field text and returns the URL to run with
pub fn check_input(raw: &str) -> Result<&str> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(TikdlError::EmptyInput);
    }
    if !is_valid_url(url) {
        return Err(TikdlError::InvalidFormat);
    }
    Ok(url)
}

/// As-you-type hint for the URL field
pub fn assess_input(raw: &str) -> InputState {
    match check_input(raw) {
        Ok(_) => InputState::Ready,
        Err(TikdlError::EmptyInput) => InputState::Empty,
        Err(_) => InputState::Invalid,
    }
}
