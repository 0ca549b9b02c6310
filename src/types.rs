//! Type definitions for tikdl
//!
//! Source of truth for all data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::TikdlError;

// ============================================
// Quality Types
// ============================================

/// Output quality offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityOption {
    /// Full HD, 1080p
    Fhd,
    #[default]
    Hd,
    Sd,
    /// Audio only
    Mp3,
}

/// Display metadata for a quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityInfo {
    pub name: &'static str,
    pub resolution: &'static str,
    /// Approximate, e.g. "~8-15 MB"
    pub size: &'static str,
}

impl QualityOption {
    /// All presets, in the order they are offered
    pub const ALL: [QualityOption; 4] = [Self::Fhd, Self::Hd, Self::Sd, Self::Mp3];

    /// Short key used on the command line and in config
    pub fn key(self) -> &'static str {
        match self {
            Self::Fhd => "fhd",
            Self::Hd => "hd",
            Self::Sd => "sd",
            Self::Mp3 => "mp3",
        }
    }

    pub fn info(self) -> QualityInfo {
        match self {
            Self::Fhd => QualityInfo {
                name: "Full HD 1080p",
                resolution: "1920x1080",
                size: "~15-25 MB",
            },
            Self::Hd => QualityInfo {
                name: "HD 720p",
                resolution: "1280x720",
                size: "~8-15 MB",
            },
            Self::Sd => QualityInfo {
                name: "SD 480p",
                resolution: "854x480",
                size: "~3-8 MB",
            },
            Self::Mp3 => QualityInfo {
                name: "MP3 Audio",
                resolution: "320kbps",
                size: "~2-5 MB",
            },
        }
    }

    /// Feedback shown right after the user picks this preset
    pub fn selected_label(self) -> &'static str {
        match self {
            Self::Fhd => "🎬 Full HD Selected",
            Self::Hd => "📱 HD Selected",
            Self::Sd => "📺 SD Selected",
            Self::Mp3 => "🎵 Audio Only Selected",
        }
    }

    pub fn is_audio_only(self) -> bool {
        self == Self::Mp3
    }
}

impl fmt::Display for QualityOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for QualityOption {
    type Err = TikdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|q| q.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                TikdlError::InvalidConfig(format!(
                    "unknown quality '{}' (expected one of fhd, hd, sd, mp3)",
                    s
                ))
            })
    }
}

// ============================================
// URL Types
// ============================================

/// Which recognized link shape a URL matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlShape {
    /// tiktok.com/@handle/video/<id>
    Video,
    /// vm.tiktok.com/<token> or vt.tiktok.com/<token>
    ShortLink,
    /// tiktok.com/t/<token>
    ShareLink,
    /// m.tiktok.com/v/<id>
    Mobile,
}

/// Live state of the URL field while the user is typing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Empty,
    Invalid,
    Ready,
}

// ============================================
// Pipeline Types
// ============================================

/// One scripted step of the simulated processing sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStep {
    pub message: String,
    pub delay: Duration,
}

impl PipelineStep {
    pub fn new(message: impl Into<String>, delay: Duration) -> Self {
        Self {
            message: message.into(),
            delay,
        }
    }
}

/// The one in-flight run. Present only while a run is in progress.
#[derive(Debug, Clone)]
pub struct RunState {
    pub submitted_url: String,
    pub quality: QualityOption,
    pub started_at: DateTime<Utc>,
}

impl RunState {
    /// Wall-clock time since the run started
    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }
}

/// A download link offered on the preview card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadLink {
    pub quality: QualityOption,
    pub label: String,
}

/// Fabricated outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub video_id: String,
    pub title: String,
    /// @handle
    pub author: String,
    /// Formatted as "0:47"
    pub duration: String,
    pub quality: QualityOption,
    pub quality_info: QualityInfo,
    /// Thumbnail image URL
    pub thumbnail: String,
    /// Inline SVG used when the thumbnail fails to load
    pub placeholder: String,
    pub downloads: Vec<DownloadLink>,
}

/// Why a submission never started a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    EmptyInput,
    InvalidFormat,
}

/// Everything the presentation layer gets told about a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// Input was refused before any step ran
    Rejected {
        category: ErrorCategory,
        message: String,
    },
    /// A step started. `index` is zero-based.
    Status {
        index: usize,
        total: usize,
        message: String,
    },
    Completed(ResultRecord),
    Failed {
        message: String,
    },
}

// ============================================
// Config Types
// ============================================

/// A pipeline step as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    pub message: String,
    pub delay_ms: u64,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quality used when none is given (default: hd)
    pub default_quality: QualityOption,
    /// Replaces the built-in step list when set
    pub steps: Option<Vec<StepConfig>>,
    /// Editor command (default: "nvim")
    pub editor: String,
    /// Colored output
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_quality: QualityOption::default(),
            steps: None,
            editor: "nvim".into(),
            color: true,
        }
    }
}
