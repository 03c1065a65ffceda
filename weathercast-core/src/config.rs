use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::Units;

/// Top-level configuration stored on disk.
///
/// The API key lives here (or in the `OPENWEATHER_API_KEY` environment
/// variable, which the CLI checks first), never in the source.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeather API key.
    pub api_key: Option<String>,

    /// Optional default unit system, e.g. "metric" or "imperial".
    pub units: Option<String>,
}

impl Config {
    /// Returns the stored API key; blank keys count as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Return the configured units as a strongly-typed value, falling back
    /// to metric when nothing is configured.
    pub fn units_or_default(&self) -> Result<Units> {
        match self.units.as_deref() {
            Some(value) => Units::try_from(value),
            None => Ok(Units::default()),
        }
    }

    pub fn set_units(&mut self, units: Units) {
        self.units = Some(units.to_string());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weathercast", "weathercast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_has_no_api_key() {
        let cfg = Config::default();
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn blank_api_keys_count_as_absent() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".to_string());
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn stored_api_key_is_returned_trimmed() {
        let mut cfg = Config::default();
        cfg.set_api_key("  SECRET  ".to_string());
        assert_eq!(cfg.api_key(), Some("SECRET"));
    }

    #[test]
    fn units_default_to_metric() {
        let cfg = Config::default();
        let units = cfg.units_or_default().expect("default units must parse");
        assert_eq!(units, Units::Metric);
    }

    #[test]
    fn configured_units_are_parsed() {
        let mut cfg = Config::default();
        cfg.set_units(Units::Imperial);

        let units = cfg.units_or_default().expect("configured units must parse");
        assert_eq!(units, Units::Imperial);
    }

    #[test]
    fn unknown_configured_units_error() {
        let cfg = Config {
            api_key: None,
            units: Some("kelvin".to_string()),
        };

        let err = cfg.units_or_default().unwrap_err();
        assert!(err.to_string().contains("Unknown units"));
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut cfg = Config::default();
        cfg.set_api_key("SECRET".to_string());
        cfg.set_units(Units::Imperial);

        let serialized = toml::to_string_pretty(&cfg).expect("config must serialize");
        let parsed: Config = toml::from_str(&serialized).expect("config must parse back");

        assert_eq!(parsed.api_key(), Some("SECRET"));
        assert_eq!(
            parsed.units_or_default().expect("units must parse"),
            Units::Imperial
        );
    }
}
