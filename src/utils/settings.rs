//! Settings file management

use crate::models::{AppSettings, BackendSettings};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const APP_DIR: &str = "com.devtracker";

pub const ENV_BACKEND_URL: &str = "DEVTRACKER_BACKEND_URL";
pub const ENV_ANON_KEY: &str = "DEVTRACKER_ANON_KEY";
pub const ENV_ACCESS_TOKEN: &str = "DEVTRACKER_ACCESS_TOKEN";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not find app support directory")]
    NoDataDir,

    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Default settings location: `<data dir>/com.devtracker/settings.json`
pub fn settings_path() -> Result<PathBuf, SettingsError> {
    let app_support = dirs::data_dir()
        .ok_or(SettingsError::NoDataDir)?
        .join(APP_DIR);
    Ok(app_support.join("settings.json"))
}

/// Read settings from `path`, falling back to defaults when the file is missing
pub fn load_settings_from(path: &Path) -> Result<AppSettings, SettingsError> {
    if !path.exists() {
        debug!("No settings file at {:?}, using defaults", path);
        return Ok(AppSettings::default());
    }

    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    fs::write(path, content)?;
    info!("Saved settings to {:?}", path);
    Ok(())
}

/// Load settings from the default location, then apply environment overrides
pub fn load_settings() -> Result<AppSettings, SettingsError> {
    let mut settings = load_settings_from(&settings_path()?)?;
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub fn save_settings(settings: &AppSettings) -> Result<(), SettingsError> {
    save_settings_to(&settings_path()?, settings)
}

/// Environment values win over the file. A backend URL together with an anon
/// key switches the backend to REST.
pub fn apply_env_overrides<F>(settings: &mut AppSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let env_url = lookup(ENV_BACKEND_URL);
    let env_key = lookup(ENV_ANON_KEY);
    let env_token = lookup(ENV_ACCESS_TOKEN);

    match &mut settings.backend {
        BackendSettings::Rest {
            url,
            anon_key,
            access_token,
            ..
        } => {
            if let Some(v) = env_url {
                *url = v;
            }
            if let Some(v) = env_key {
                *anon_key = v;
            }
            if env_token.is_some() {
                *access_token = env_token;
            }
        }
        _ => {
            if let (Some(url), Some(anon_key)) = (env_url, env_key) {
                debug!("Backend configured from environment");
                settings.backend = BackendSettings::Rest {
                    url,
                    anon_key,
                    access_token: env_token,
                    user_id: None,
                    table: "projects".to_string(),
                };
            }
        }
    }
}
