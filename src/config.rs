//! On-disk settings for the CLI
//!
//! Stored as TOML, by default at `~/.pacers/config.toml` (override with
//! `PACERS_CONFIG`). Every section falls back to its defaults when absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PaceError, Result};
use crate::logging::LogConfig;
use crate::zones::HrZoneMethod;

pub use crate::load::LoadConfig;

const CONFIG_ENV_VAR: &str = "PACERS_CONFIG";
const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub metadata: ConfigMetadata,

    #[serde(default)]
    pub logging: LogConfig,

    /// ACWR windows and thresholds
    #[serde(default)]
    pub load: LoadConfig,

    #[serde(default)]
    pub zones: ZoneSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// File format version
    pub version: String,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every save
    pub updated_at: DateTime<Utc>,
}

impl ConfigMetadata {
    fn fresh() -> Self {
        let now = Utc::now();
        Self {
            version: FORMAT_VERSION.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Training zone preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneSettings {
    /// HR method used when both threshold HR and max/resting HR are supplied
    pub hr_method: HrZoneMethod,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            metadata: ConfigMetadata::fresh(),
            logging: LogConfig::default(),
            load: LoadConfig::default(),
            zones: ZoneSettings::default(),
        }
    }
}

impl AppConfig {
    /// Read and validate a TOML config file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| PaceError::Configuration(format!("cannot read {}: {}", path.display(), e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| PaceError::Configuration(format!("invalid TOML in {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as TOML, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.validate()?;
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PaceError::Configuration(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .map_err(|e| PaceError::Configuration(format!("cannot serialize config: {}", e)))?;
        fs::write(path, toml_content)
            .map_err(|e| PaceError::Configuration(format!("cannot write {}: {}", path.display(), e)))
    }

    /// Reject load settings that would make the ACWR windows meaningless
    pub fn validate(&self) -> Result<()> {
        let load = &self.load;
        let problem = if load.chronic_weeks == 0 {
            Some("load.chronic_weeks must be at least 1")
        } else if load.acute_span_days == 0 || load.chronic_span_days == 0 {
            Some("load EWMA spans must be at least 1 day")
        } else if load.acute_span_days >= load.chronic_span_days {
            Some("load.acute_span_days must be shorter than load.chronic_span_days")
        } else if load.spike_window_days == 0 || load.streak_window_days == 0 {
            Some("load spike and streak windows must be at least 1 day")
        } else if !(load.spike_factor.is_finite() && load.spike_factor >= 1.0) {
            Some("load.spike_factor must be a finite value of at least 1.0")
        } else if !(load.hard_day_multiplier.is_finite() && load.hard_day_multiplier > 0.0) {
            Some("load.hard_day_multiplier must be positive")
        } else {
            None
        };

        match problem {
            Some(reason) => Err(PaceError::Configuration(reason.to_string())),
            None => Ok(()),
        }
    }

    /// `$PACERS_CONFIG`, else `~/.pacers/config.toml`
    pub fn default_config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pacers")
            .join("config.toml")
    }

    /// Config at the default path, or defaults when it is missing or invalid
    pub fn load_or_default() -> Self {
        let path = Self::default_config_path();
        Self::load_from_file(&path).unwrap_or_else(|err| {
            tracing::debug!(path = %path.display(), error = %err, "Falling back to default configuration");
            Self::default()
        })
    }

    pub fn save_default(&mut self) -> Result<()> {
        let path = Self::default_config_path();
        self.save_to_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();

        assert_eq!(parsed.metadata.version, FORMAT_VERSION);
        assert_eq!(parsed.load, config.load);
        assert_eq!(parsed.zones, config.zones);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let text = r#"
            [metadata]
            version = "1.0"
            created_at = "2026-01-01T00:00:00Z"
            updated_at = "2026-01-01T00:00:00Z"

            [load]
            spike_factor = 1.2

            [zones]
            hr_method = "karvonen"
        "#;
        let config: AppConfig = toml::from_str(text).unwrap();

        assert_eq!(config.load.spike_factor, 1.2);
        assert_eq!(config.load.min_daily_entries, 28);
        assert_eq!(config.zones.hr_method, HrZoneMethod::Karvonen);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.load.chronic_weeks = 6;
        config.save_to_file(&path).unwrap();

        let reloaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(reloaded.load.chronic_weeks, 6);
    }

    #[test]
    fn test_invalid_load_settings_rejected() {
        let mut config = AppConfig::default();
        config.load.acute_span_days = 28;
        config.load.chronic_span_days = 7;
        assert!(matches!(config.validate(), Err(PaceError::Configuration(_))));

        let mut config = AppConfig::default();
        config.load.spike_factor = 0.9;
        let dir = tempdir().unwrap();
        assert!(config.save_to_file(dir.path().join("config.toml")).is_err());
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let dir = tempdir().unwrap();
        let err = AppConfig::load_from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, PaceError::Configuration(_)));
    }
}
