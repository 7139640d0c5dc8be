use std::time::Duration;

use crate::{ConfigError, FilterCriteria, Location};

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

/// Every user-adjustable setting, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSnapshot {
    pub refresh_interval_secs: u64,
    pub location: Location,
    pub criteria: FilterCriteria,
}

impl Default for SettingsSnapshot {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            location: Location::default(),
            criteria: FilterCriteria::default(),
        }
    }
}

impl SettingsSnapshot {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

/// Converts a seconds count into a usable refresh interval.
pub fn refresh_interval_from_secs(secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidRefreshInterval);
    }
    Ok(Duration::from_secs(secs))
}
