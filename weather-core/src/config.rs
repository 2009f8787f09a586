use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    history::DEFAULT_HISTORY_DISPLAY,
    model::{AUTO_TIMEZONE, VariableSet},
    provider::openmeteo::{FORECAST_URL, GEOCODING_URL},
    window::DEFAULT_WINDOW,
};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Remote API endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocoding: String,
    pub forecast: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding: GEOCODING_URL.to_string(),
            forecast: FORECAST_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// timeout_secs = 10
/// timezone = "auto"
/// hourly = ["temperature_2m", "relativehumidity_2m"]
/// forecast_hours = 48
/// history_display = 10
///
/// [endpoints]
/// geocoding = "https://geocoding-api.open-meteo.com/v1/search"
/// forecast = "https://api.open-meteo.com/v1/forecast"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-request timeout for both APIs.
    pub timeout_secs: u64,

    /// Timezone mode passed to the forecast API; "auto" lets it pick from the coordinates.
    pub timezone: String,

    /// Hourly variables requested from the forecast API.
    pub hourly: VariableSet,

    /// Maximum number of hourly points in the charts.
    pub forecast_hours: usize,

    /// How many history entries the interactive menu offers.
    pub history_display: usize,

    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            timezone: AUTO_TIMEZONE.to_string(),
            hourly: VariableSet::default(),
            forecast_hours: DEFAULT_WINDOW,
            history_display: DEFAULT_HISTORY_DISPLAY,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject settings no lookup could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }
        if self.timezone.trim().is_empty() {
            return Err(anyhow!("timezone must not be empty (use \"auto\" to let the provider decide)"));
        }
        if self.hourly.is_empty() {
            return Err(anyhow!("hourly must list at least one variable"));
        }
        if self.forecast_hours == 0 {
            return Err(anyhow!("forecast_hours must be greater than zero"));
        }
        Ok(())
    }

    /// Load config from the default location, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load config from `path`, or return defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
