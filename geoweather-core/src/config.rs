use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    location::{FixedLocation, IpLocation, LocationProvider},
    model::Coordinates,
    provider::openweather::OpenWeatherClient,
    store::FileStore,
};

/// Settings stored on disk. Every field is optional; an absent file means
/// all defaults.
///
/// Example TOML:
/// ```toml
/// openweather_base_url = "https://api.openweathermap.org"
///
/// [location]
/// latitude = 37.5
/// longitude = 127.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    pub openweather_base_url: Option<String>,

    /// IP geolocation endpoint used when no fixed location is set.
    pub geolocation_url: Option<String>,

    /// Where the API key is persisted. Defaults to the platform data dir.
    pub storage_path: Option<PathBuf>,

    /// Pin the panel to these coordinates instead of looking them up.
    /// Kept last so it serializes as a trailing table.
    pub location: Option<Coordinates>,
}

impl Settings {
    /// Load settings from the default path, or defaults if the file doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Save settings, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize settings to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "geoweather", "geoweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// A fixed location if one is configured, IP lookup otherwise.
    pub fn location_provider(&self) -> Box<dyn LocationProvider> {
        match (self.location, &self.geolocation_url) {
            (Some(coords), _) => Box::new(FixedLocation(coords)),
            (None, Some(url)) => Box::new(IpLocation::with_url(url.clone())),
            (None, None) => Box::new(IpLocation::new()),
        }
    }

    pub fn weather_client(&self) -> OpenWeatherClient {
        match &self.openweather_base_url {
            Some(url) => OpenWeatherClient::with_base_url(url.clone()),
            None => OpenWeatherClient::new(),
        }
    }

    pub fn open_store(&self) -> Result<FileStore> {
        let path = match &self.storage_path {
            Some(p) => p.clone(),
            None => FileStore::default_path()?,
        };

        FileStore::open(&path)
            .with_context(|| format!("Failed to open key storage: {}", path.display()))
    }
}
