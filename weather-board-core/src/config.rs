use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    location::{DEFAULT_COORDINATES, DEFAULT_LOCATE_TIMEOUT},
    model::Coordinates,
};

pub const DEFAULT_ENDPOINT: &str = "http://web-lab2-bgubanov.herokuapp.com";

/// Overrides `endpoint` from the config file when set.
pub const ENDPOINT_ENV: &str = "WEATHER_BOARD_ENDPOINT";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// endpoint = "http://localhost:3000"
/// geolocation_timeout_ms = 5000
///
/// [home]
/// latitude = 48.8566
/// longitude = 2.3522
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Base URL of the weather/favorites service.
    pub endpoint: Option<String>,

    pub geolocation_timeout_ms: Option<u64>,

    /// Where this device is, if known.
    pub home: Option<Coordinates>,

    /// Used when the device position cannot be determined.
    pub fallback: Option<Coordinates>,
}

impl Config {
    /// Effective endpoint for one run. An explicit `flag` wins over the
    /// environment, which wins over the file.
    pub fn endpoint_with(&self, flag: Option<&str>) -> Result<String> {
        self.endpoint_from(flag, std::env::var(ENDPOINT_ENV).ok())
    }

    /// Endpoint as stored in the file, or the built-in default.
    pub fn stored_endpoint(&self) -> String {
        self.endpoint.clone().unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    fn endpoint_from(&self, flag: Option<&str>, env: Option<String>) -> Result<String> {
        if let Some(flag) = flag {
            return normalize_endpoint(flag);
        }

        match env.filter(|v| !v.trim().is_empty()) {
            Some(env) => normalize_endpoint(&env)
                .with_context(|| format!("Invalid {ENDPOINT_ENV} value")),
            None => Ok(self.stored_endpoint()),
        }
    }

    pub fn fallback_coordinates(&self) -> Coordinates {
        self.fallback.unwrap_or(DEFAULT_COORDINATES)
    }

    pub fn geolocation_timeout(&self) -> Duration {
        self.geolocation_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_LOCATE_TIMEOUT)
    }

    pub fn set_endpoint(&mut self, endpoint: &str) -> Result<()> {
        self.endpoint = Some(normalize_endpoint(endpoint)?);
        Ok(())
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

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

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-board", "weather-board")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn normalize_endpoint(endpoint: &str) -> Result<String> {
    let endpoint = endpoint.trim();
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(anyhow!("Endpoint must start with http:// or https://, got '{endpoint}'"));
    }
    Ok(endpoint.trim_end_matches('/').to_string())
}
