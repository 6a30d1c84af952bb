use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SettingsError;
use crate::presence::PostMatchTrigger;

const SETTINGS_DIR: &str = "deadlock-rpc";
const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_HERO_ASSETS_URL: &str = "https://assets.deadlock-api.com/v2/heroes";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Discord application id. Zero means "not configured" and disables presence.
    pub application_id: i64,
    pub poll_interval_secs: u64,
    pub min_push_interval_secs: u64,
    pub staleness_secs: u64,
    pub gsi_port: u16,
    pub process_names: Vec<String>,
    pub game_dir: Option<PathBuf>,
    pub hero_assets_url: String,
    pub asset_refresh_secs: u64,
    pub post_match: PostMatchTrigger,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            application_id: 0,
            poll_interval_secs: 5,
            min_push_interval_secs: 15,
            staleness_secs: 10,
            gsi_port: 3000,
            process_names: vec![
                "project8.exe".to_string(),
                "deadlock.exe".to_string(),
                "project8".to_string(),
            ],
            game_dir: None,
            hero_assets_url: DEFAULT_HERO_ASSETS_URL.to_string(),
            asset_refresh_secs: 30 * 60,
            post_match: PostMatchTrigger::GameOverFlag,
        }
    }
}

impl AppSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn min_push_interval(&self) -> Duration {
        Duration::from_secs(self.min_push_interval_secs)
    }

    pub fn staleness_threshold(&self) -> Duration {
        Duration::from_secs(self.staleness_secs)
    }

    pub fn asset_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.asset_refresh_secs.max(60))
    }

    pub fn has_application_id(&self) -> bool {
        self.application_id > 0
    }

    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let dir = dirs::config_dir()
            .ok_or(SettingsError::NoConfigDir)?
            .join(SETTINGS_DIR);
        Ok(dir.join(SETTINGS_FILE))
    }

    /// Reads settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        tracing::debug!("Loading settings from {}", path.display());

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Like [`AppSettings::load`], but a broken file is logged and replaced by defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        tracing::debug!("Saving settings to {}", path.display());

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AppSettings::load(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.min_push_interval(), Duration::from_secs(15));
        assert!(!settings.has_application_id());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "application_id": 1234, "staleness_secs": 20, "unknown": true }"#,
        )
        .unwrap();

        let settings = AppSettings::load(&path).unwrap();
        assert_eq!(settings.application_id, 1234);
        assert_eq!(settings.staleness_threshold(), Duration::from_secs(20));
        assert_eq!(settings.gsi_port, 3000);
        assert_eq!(settings.post_match, PostMatchTrigger::GameOverFlag);
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(AppSettings::load(&path).is_err());
        assert_eq!(AppSettings::load_or_default(&path), AppSettings::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = AppSettings {
            application_id: 42,
            post_match: PostMatchTrigger::Never,
            game_dir: Some(PathBuf::from("/games/Deadlock")),
            ..AppSettings::default()
        };

        settings.save(&path).unwrap();
        assert_eq!(AppSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn poll_interval_never_zero() {
        let settings = AppSettings {
            poll_interval_secs: 0,
            ..AppSettings::default()
        };
        assert_eq!(settings.poll_interval(), Duration::from_secs(1));
    }
}
