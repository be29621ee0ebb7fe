use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::settings::{ClientSettings, BASE_URL_ENV};

pub fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("narrated_quest");
    path.push("client_settings.json");
    path
}

/// Reads settings from `path`. A missing or unreadable file yields defaults.
pub fn load_settings_from(path: &Path) -> ClientSettings {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_else(|| {
            debug!(path = %path.display(), "no usable settings file, using defaults");
            ClientSettings::default()
        })
}

pub fn save_settings_to(path: &Path, settings: &ClientSettings) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating settings directory {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).with_context(|| format!("writing settings to {}", path.display()))?;
    Ok(())
}

/// Settings from the default location with the environment override
/// applied. A player id is generated and persisted on first run.
pub fn load_settings() -> Result<ClientSettings> {
    let path = settings_path();
    let mut settings = load_settings_from(&path);
    if settings.ensure_player_id() {
        save_settings_to(&path, &settings)?;
    }
    Ok(settings.with_env_override(std::env::var(BASE_URL_ENV).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("client_settings.json");

        let settings = ClientSettings {
            base_url: "http://example.test".into(),
            player_id: "player_42".into(),
            retry_delay_ms: 10,
            ..Default::default()
        };
        save_settings_to(&path, &settings).unwrap();
        assert_eq!(load_settings_from(&path), settings);
    }

    #[test]
    fn garbage_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client_settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings_from(&path), ClientSettings::default());
    }
}
