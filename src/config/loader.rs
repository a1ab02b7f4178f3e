use super::Settings;
use crate::error::{ErrorCode, Result, TfcError};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// `<config dir>/tfc-trigger/config.toml`, when a home directory is known
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("io", "tfc-trigger", "tfc-trigger")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load settings from the config file and the process environment.
///
/// An explicit `path` must exist; the default location is optional.
pub async fn load_settings(path: Option<&Path>) -> Result<Settings> {
    load_settings_with(path, default_config_path(), |key| std::env::var(key).ok()).await
}

/// [`load_settings`] with the default path and environment supplied by the caller
pub async fn load_settings_with(
    explicit: Option<&Path>,
    default_path: Option<PathBuf>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let mut settings = match explicit {
        Some(path) => {
            if !fs::try_exists(path).await.unwrap_or(false) {
                return Err(TfcError::config_with_code(
                    ErrorCode::CONFIG_NOT_FOUND,
                    format!("config file {} does not exist", path.display()),
                    Some("config".to_string()),
                ));
            }
            read_file(path).await?
        }
        None => match default_path {
            Some(path) if fs::try_exists(&path).await.unwrap_or(false) => read_file(&path).await?,
            _ => Settings::default(),
        },
    };

    settings.merge_env_with(lookup)?;
    settings.validate()?;
    Ok(settings)
}

async fn read_file(path: &Path) -> Result<Settings> {
    debug!("Loading settings from {}", path.display());
    let content = fs::read_to_string(path).await?;
    toml::from_str::<Settings>(&content)
        .map_err(|e| TfcError::from(e).with_context(path.display()))
}
