use thiserror::Error;

/// Invalid user or file configuration. Never recovered by retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("refresh interval must be greater than zero seconds")]
    InvalidRefreshInterval,
    #[error("{field} price {value:?} is not a number")]
    InvalidPrice { field: &'static str, value: String },
    #[error("{field} price must not be negative")]
    NegativePrice { field: &'static str },
    #[error("minimum price {min:.2} is above maximum price {max:.2}")]
    InvertedPriceRange { min: f64, max: f64 },
    #[error("search radius must be greater than zero")]
    InvalidRadius,
    #[error("coordinates ({lat}, {lng}) are out of range")]
    InvalidCoordinates { lat: f64, lng: f64 },
}
