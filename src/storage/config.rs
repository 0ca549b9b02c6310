//! Configuration management

use crate::error::Result;
use crate::types::Config;
use crate::utils::paths::{ensure_dir, get_config_path};
use std::path::Path;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, warn};

/// Load configuration from the default location
pub async fn load_config() -> Result<Config> {
    load_config_from(&get_config_path()).await
}

/// Load configuration from `path`, falling back to defaults when absent.
///
/// Fields missing from the file keep their default values. The step list is
/// checked later by `Pipeline::from_config`, right before a run, so a broken
/// list never blocks `--edit`.
pub async fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).await?;
    let config: Config = serde_json::from_str(&content)?;

    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Save configuration to file
pub async fn save_config(config: &Config) -> Result<()> {
    save_config_to(config, &get_config_path()).await
}

async fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content).await?;
    Ok(())
}

/// Editor for `--edit`. Whatever is wrong with the file, this falls back to
/// the default editor so the file can still be opened and fixed.
pub async fn resolve_editor() -> String {
    resolve_editor_from(&get_config_path()).await
}

async fn resolve_editor_from(path: &Path) -> String {
    match load_config_from(path).await {
        Ok(config) => config.editor,
        Err(err) => {
            warn!(error = %err, "config unreadable, using default editor");
            Config::default().editor
        }
    }
}

/// Open config file in editor
pub async fn edit_config(editor: &str) -> Result<()> {
    let config_path = get_config_path();

    // Ensure config file exists
    if !config_path.exists() {
        save_config(&Config::default()).await?;
    }

    Command::new(editor).arg(&config_path).status().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::Pipeline;
    use crate::error::TikdlError;
    use crate::types::QualityOption;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("tikdl-test-{}-{}", std::process::id(), name))
            .join("config.json")
    }

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let config = load_config_from(&temp_path("missing")).await.unwrap();
        assert_eq!(config.default_quality, QualityOption::Hd);
        assert!(config.steps.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let config = Config {
            default_quality: QualityOption::Fhd,
            color: false,
            ..Config::default()
        };
        save_config_to(&config, &path).await.unwrap();

        let loaded = load_config_from(&path).await.unwrap();
        assert_eq!(loaded.default_quality, QualityOption::Fhd);
        assert!(!loaded.color);

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn test_zero_delay_steps_load_but_fail_pipeline() {
        let path = temp_path("zero-delay");
        ensure_dir(path.parent().unwrap()).await.unwrap();
        fs::write(
            &path,
            r#"{"editor":"vi","steps":[{"message":"instant","delay_ms":0}]}"#,
        )
        .await
        .unwrap();

        let config = load_config_from(&path).await.unwrap();
        assert_eq!(resolve_editor_from(&path).await, "vi");

        let result = Pipeline::from_config(config.steps.as_deref());
        assert!(matches!(result, Err(TikdlError::InvalidConfig(_))));

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn test_rejects_malformed_json() {
        let path = temp_path("malformed");
        ensure_dir(path.parent().unwrap()).await.unwrap();
        fs::write(&path, "{ not json").await.unwrap();

        let result = load_config_from(&path).await;
        assert!(matches!(result, Err(TikdlError::Json(_))));
        assert_eq!(resolve_editor_from(&path).await, Config::default().editor);

        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
    }
}
