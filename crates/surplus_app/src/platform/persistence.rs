use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use surplus_core::{
    refresh_interval_from_secs, ConfigError, FilterCriteria, Location, SettingsSnapshot,
    DEFAULT_MAX_PRICE, DEFAULT_MIN_PRICE, DEFAULT_RADIUS_KM, DEFAULT_REFRESH_INTERVAL_SECS,
};
use surplus_engine::{write_atomically, MarketplaceSettings};
use surplus_logging::{watch_info, watch_warn};

const APP_DIR_NAME: &str = "surplus_watch";
const CONFIG_FILENAME: &str = "config.ron";
const LOG_FILENAME: &str = "surplus_watch.log";
pub(crate) const DEFAULT_BASE_URL: &str = "https://apptoogoodtogo.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub refresh_interval_secs: u64,
    pub location: LocationConfig,
    pub filters: FilterConfig,
    pub credentials: CredentialsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct LocationConfig {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct FilterConfig {
    pub keywords: Vec<String>,
    pub vendor: Option<String>,
    pub min_price: f64,
    pub max_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct CredentialsConfig {
    pub access_token: String,
    pub base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            location: LocationConfig::default(),
            filters: FilterConfig::default(),
            credentials: CredentialsConfig::default(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            lat: Some(52.2297),
            lng: Some(21.0122),
            radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            vendor: None,
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Validated settings. A location needs both coordinates; with only one
    /// of them the search centre counts as unset.
    pub fn settings(&self) -> Result<SettingsSnapshot, ConfigError> {
        refresh_interval_from_secs(self.refresh_interval_secs)?;

        let location = match (self.location.lat, self.location.lng) {
            (Some(lat), Some(lng)) => Location::new(lat, lng, self.location.radius_km),
            _ => Location::unset(self.location.radius_km),
        };
        location.validate()?;

        let criteria = FilterCriteria::from_parts(
            &self.filters.keywords,
            self.filters.vendor.as_deref(),
            self.filters.min_price,
            self.filters.max_price,
        )?;

        Ok(SettingsSnapshot {
            refresh_interval_secs: self.refresh_interval_secs,
            location,
            criteria,
        })
    }

    /// Replaces the user-adjustable parts; credentials are kept.
    pub fn apply_settings(&mut self, settings: &SettingsSnapshot) {
        let coordinates = settings.location.coordinates;
        let criteria = &settings.criteria;
        self.refresh_interval_secs = settings.refresh_interval_secs;
        self.location = LocationConfig {
            lat: coordinates.map(|c| c.lat),
            lng: coordinates.map(|c| c.lng),
            radius_km: settings.location.radius_km,
        };
        self.filters = FilterConfig {
            keywords: criteria.keywords().iter().cloned().collect(),
            vendor: criteria.vendor().map(ToOwned::to_owned),
            min_price: criteria.min_price(),
            max_price: criteria.max_price(),
        };
    }

    pub fn marketplace_settings(&self) -> MarketplaceSettings {
        MarketplaceSettings::new(
            self.credentials.base_url.clone(),
            self.credentials.access_token.clone(),
        )
    }
}

pub(crate) fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(CONFIG_FILENAME)
}

pub(crate) fn default_log_path(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(LOG_FILENAME),
        _ => PathBuf::from(".").join(LOG_FILENAME),
    }
}

/// The ron config file on disk.
pub(crate) struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the config, writing the defaults first when no file exists.
    pub fn load_or_create(&self) -> anyhow::Result<AppConfig> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                watch_info!("No config at {:?}; writing defaults", self.path);
                let config = AppConfig::default();
                if let Err(err) = self.save(&config) {
                    watch_warn!("Could not write default config: {:#}", err);
                }
                return Ok(config);
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {:?}", self.path));
            }
        };

        let config: AppConfig = ron::from_str(&content)
            .with_context(|| format!("parsing config {:?}", self.path))?;
        watch_info!("Loaded config from {:?}", self.path);
        Ok(config)
    }

    pub fn save(&self, config: &AppConfig) -> anyhow::Result<()> {
        let pretty = ron::ser::PrettyConfig::new();
        let content =
            ron::ser::to_string_pretty(config, pretty).context("serializing config")?;
        write_atomically(&self.path, &content)
            .with_context(|| format!("writing config {:?}", self.path))?;
        watch_info!("Saved config to {:?}", self.path);
        Ok(())
    }
}
