//! Path utilities for tikdl
//!
//! Respects XDG Base Directory Specification

use crate::error::Result;
use std::env;
use std::path::PathBuf;
use tokio::fs;

const APP_NAME: &str = "tikdl";

/// Get config directory path
/// Respects XDG_CONFIG_HOME, defaults to ~/.config/tikdl
pub fn get_config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", dirs::config_dir, ".config")
}

/// Get state directory path (logs)
/// Respects XDG_STATE_HOME, defaults to ~/.local/state/tikdl
pub fn get_state_dir() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", dirs::state_dir, ".local/state")
}

/// Get config file path
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.json")
}

/// Get log file path
pub fn get_log_path() -> PathBuf {
    get_state_dir().join(format!("{}.log", APP_NAME))
}

fn xdg_dir(var: &str, fallback: fn() -> Option<PathBuf>, home_relative: &str) -> PathBuf {
    let base = env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(fallback)
        .unwrap_or_else(|| PathBuf::from(env::var("HOME").unwrap_or_default()).join(home_relative));

    base.join(APP_NAME)
}

/// Ensure a directory exists
pub async fn ensure_dir(path: &std::path::Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    Ok(())
}
