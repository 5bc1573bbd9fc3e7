//! Application configuration
//!
//! Read from `gatepass.toml` in the platform config directory, or from the
//! file named by `GATEPASS_CONFIG`. Every field has a default, so a missing
//! file is not an error. `GATEPASS_DATA_DIR` overrides `data_dir`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use gatepass_core::notify::NotificationSettings;
use serde::Deserialize;

const CONFIG_FILE: &str = "gatepass.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the database lives; defaults to the platform data directory
    pub data_dir: Option<PathBuf>,
    /// Name used in visitor notifications
    pub organization_name: String,
    pub station: StationConfig,
    pub notifications: NotificationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            organization_name: "Gatepass".to_string(),
            station: StationConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Display name of the guard signed in at this station
    pub guard_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub email: bool,
    pub sms: bool,
    pub check_in: bool,
    pub reminder: bool,
    /// Simulated delivery latency
    pub delivery_delay_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        let settings = NotificationSettings::default();
        Self {
            email: settings.email,
            sms: settings.sms,
            check_in: settings.check_in,
            reminder: settings.reminder,
            delivery_delay_ms: 500,
        }
    }
}

impl NotificationConfig {
    pub fn settings(&self) -> NotificationSettings {
        NotificationSettings {
            email: self.email,
            sms: self.sms,
            check_in: self.check_in,
            reminder: self.reminder,
        }
    }

    pub fn delivery_delay(&self) -> Duration {
        Duration::from_millis(self.delivery_delay_ms)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "onyx", "gatepass")
}

impl AppConfig {
    /// Load from the environment-selected or default config file
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os("GATEPASS_CONFIG") {
            Some(path) => Some(PathBuf::from(path)),
            None => project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE)),
        };

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        if let Some(dir) = std::env::var_os("GATEPASS_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("parse config: {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Resolved data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .context("Could not determine data directory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.organization_name, "Gatepass");
        assert!(config.station.guard_name.is_none());
        assert_eq!(config.notifications.settings(), NotificationSettings::default());
        assert_eq!(config.notifications.delivery_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_overrides() {
        let config = AppConfig::from_toml_str(
            r#"
            data_dir = "/var/lib/gatepass"
            organization_name = "Ministry HQ"

            [station]
            guard_name = "Faisal"

            [notifications]
            sms = false
            delivery_delay_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/var/lib/gatepass"));
        assert_eq!(config.organization_name, "Ministry HQ");
        assert_eq!(config.station.guard_name.as_deref(), Some("Faisal"));
        assert!(config.notifications.email);
        assert!(!config.notifications.sms);
        assert_eq!(config.notifications.delivery_delay(), Duration::ZERO);
    }

    #[test]
    fn test_rejects_bad_types() {
        assert!(AppConfig::from_toml_str("organization_name = 3").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "organization_name = \"Tower B\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.organization_name, "Tower B");
    }
}
