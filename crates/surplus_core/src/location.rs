use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Search centre and radius. Without coordinates no cycle fetches anything.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub coordinates: Option<Coordinates>,
    pub radius_km: f64,
}

pub const DEFAULT_RADIUS_KM: f64 = 5.0;

impl Location {
    pub fn new(lat: f64, lng: f64, radius_km: f64) -> Self {
        Self {
            coordinates: Some(Coordinates { lat, lng }),
            radius_km,
        }
    }

    pub fn unset(radius_km: f64) -> Self {
        Self {
            coordinates: None,
            radius_km,
        }
    }

    pub fn is_set(&self) -> bool {
        self.coordinates.is_some()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius_km.is_finite() && self.radius_km > 0.0) {
            return Err(ConfigError::InvalidRadius);
        }
        if let Some(Coordinates { lat, lng }) = self.coordinates {
            let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
            let lng_ok = lng.is_finite() && (-180.0..=180.0).contains(&lng);
            if !(lat_ok && lng_ok) {
                return Err(ConfigError::InvalidCoordinates { lat, lng });
            }
        }
        Ok(())
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::unset(DEFAULT_RADIUS_KM)
    }
}
