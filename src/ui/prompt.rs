//! Interactive prompts (dialoguer)

use dialoguer::{Input, Select, theme::ColorfulTheme};

use crate::core::validator::assess_input;
use crate::error::TikdlError;
use crate::types::{InputState, QualityOption};

/// Ask for the TikTok link.
///
/// A malformed link is refused inline and asked for again. Empty input is
/// let through; the session reports it.
pub fn prompt_url() -> dialoguer::Result<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Paste a TikTok URL")
        .allow_empty(true)
        .validate_with(|input: &String| hint(input))
        .interact_text()
}

/// Inline hint for the URL prompt
fn hint(input: &str) -> Result<(), String> {
    match assess_input(input) {
        InputState::Invalid => Err(TikdlError::InvalidFormat.to_string()),
        InputState::Empty | InputState::Ready => Ok(()),
    }
}

/// Pick one of the four presets. `Ok(None)` if the user backs out.
pub fn pick_quality(default: QualityOption) -> dialoguer::Result<Option<QualityOption>> {
    let labels: Vec<String> = QualityOption::ALL.iter().map(|q| quality_label(*q)).collect();
    let default_index = QualityOption::ALL
        .iter()
        .position(|q| *q == default)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Quality")
        .items(&labels)
        .default(default_index)
        .interact_opt()?;

    Ok(selection.and_then(|i| QualityOption::ALL.get(i).copied()))
}

fn quality_label(quality: QualityOption) -> String {
    let info = quality.info();
    format!("{} ({}, {})", info.name, info.resolution, info.size)
}
