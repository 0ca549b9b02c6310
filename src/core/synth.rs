//! Fabricated preview metadata
//!
//! Nothing here describes a real video. The URL is hashed so the same link
//! always produces the same card, and different links produce different ones.

use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

use crate::core::validator::extract_video_id;
use crate::types::{DownloadLink, QualityOption, ResultRecord};

const TITLES: [&str; 8] = [
    "Amazing TikTok Video",
    "Wait for the ending 😂",
    "POV: you found the best recipe",
    "Dance challenge gone right",
    "Morning routine, but make it fast",
    "This trick changed my life",
    "Sunset timelapse 🌅",
    "Cat vs. cucumber, round 2",
];

const HANDLES: [&str; 6] = [
    "creator",
    "tiktoker",
    "daily.vibes",
    "clip_master",
    "trend.hunter",
    "viral_now",
];

const MIN_DURATION_SECS: u32 = 15;
const MAX_DURATION_SECS: u32 = 179;

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"tiktok\.com/(@[A-Za-z0-9_.-]+)").expect("Invalid regex"));

/// Build the preview record for `url` at `quality`
pub fn synthesize(url: &str, quality: QualityOption) -> ResultRecord {
    let url = url.trim();
    let digest = Sha256::digest(url.as_bytes());

    let title = TITLES[digest[0] as usize % TITLES.len()].to_string();

    let author = HANDLE_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| {
            let handle = HANDLES[digest[1] as usize % HANDLES.len()];
            format!("@{}{}", handle, u16::from_be_bytes([digest[2], digest[3]]) % 1000)
        });

    let span = MAX_DURATION_SECS - MIN_DURATION_SECS + 1;
    let seconds = MIN_DURATION_SECS + u32::from(u16::from_be_bytes([digest[4], digest[5]])) % span;

    let video_id = extract_video_id(url).unwrap_or_else(|| {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[8..16]);
        format!("{:019}", u64::from_be_bytes(bytes) % 10_000_000_000_000_000_000)
    });

    let seed: String = digest[..6].iter().map(|b| format!("{:02x}", b)).collect();

    ResultRecord {
        video_id,
        title,
        author,
        duration: format_duration(seconds),
        quality,
        quality_info: quality.info(),
        thumbnail: format!("https://picsum.photos/seed/{}/300/400", seed),
        placeholder: placeholder_image(),
        downloads: download_links(quality),
    }
}

/// Format seconds as "m:ss"
fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Links offered on the card. Video presets also get an audio-only link.
fn download_links(quality: QualityOption) -> Vec<DownloadLink> {
    let mut links = vec![DownloadLink {
        quality,
        label: format!("📥 Download {}", quality.info().name),
    }];

    if !quality.is_audio_only() {
        links.push(DownloadLink {
            quality: QualityOption::Mp3,
            label: "🎵 Download MP3 Audio".into(),
        });
    }

    links
}

/// Gray 300x400 card with a play triangle, as a data URI
fn placeholder_image() -> String {
    let svg = concat!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" "##,
        r##"width="300" height="400" viewBox="0 0 300 400">"##,
        r##"<rect width="300" height="400" fill="#1f1f1f"/>"##,
        r##"<polygon points="125,170 125,230 180,200" fill="#fe2c55"/>"##,
        r##"</svg>"##,
    );
    format!("data:image/svg+xml,{}", urlencoding::encode(svg))
}
