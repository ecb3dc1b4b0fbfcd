//! Runtime settings: built-in defaults, an optional TOML file, then
//! environment overrides for the API keys.
//!
//! ```toml
//! database = "weather.db"
//! location = "New+York"
//! poll_interval_secs = 15
//!
//! [provider]
//! forecast_key = "..."
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use wxd_wwo::{Credentials, DEFAULT_BASE_URL};

pub const HISTORICAL_KEY_VAR: &str = "WXD_HISTORICAL_KEY";
pub const FORECAST_KEY_VAR: &str = "WXD_FORECAST_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub base_url: String,
    pub historical_key: String,
    pub forecast_key: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            historical_key: String::new(),
            forecast_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQLite file holding both collection pairs.
    pub database: PathBuf,
    /// Location key the scheduler ingests.
    pub location: String,
    pub poll_interval_secs: u64,
    pub cache_ttl_secs: u64,
    pub num_of_days: u32,
    /// Hourly forecast rows kept per ingestion, the current row included.
    pub num_of_hours: usize,
    pub provider: ProviderSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: PathBuf::from("weather.db"),
            location: "New+York".to_string(),
            poll_interval_secs: 15,
            cache_ttl_secs: 10,
            num_of_days: 7,
            num_of_hours: 24,
            provider: ProviderSettings::default(),
        }
    }
}

impl Settings {
    /// Defaults, overlaid with `path` when given, then with the key
    /// environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env(|name| std::env::var(name).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Non-empty values returned by `lookup` replace the configured keys.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(key) = non_empty(HISTORICAL_KEY_VAR) {
            self.provider.historical_key = key;
        }
        if let Some(key) = non_empty(FORECAST_KEY_VAR) {
            self.provider.forecast_key = key;
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            historical_key: self.provider.historical_key.clone(),
            forecast_key: self.provider.forecast_key.clone(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
