use std::time::Duration;

use surplus_core::{Coordinates, Offer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub coordinates: Coordinates,
    pub radius_km: f64,
    pub timeout: Duration,
}

/// Offers decoded from one response plus the count of records dropped as
/// malformed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchedOffers {
    pub offers: Vec<Offer>,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("marketplace rejected the credentials: {0}")]
    Unauthenticated(String),
    #[error("rate limited by marketplace")]
    RateLimited { retry_after: Option<Duration> },
    #[error("network error: {0}")]
    Network(String),
    #[error("marketplace server error (status {status})")]
    Server { status: u16 },
    #[error("request timed out")]
    Timeout,
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

impl SourceError {
    /// Only a credential rejection needs the user; everything else is retried.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SourceError::Unauthenticated(_))
    }
}

/// The marketplace as seen by the poll cycle.
#[async_trait::async_trait]
pub trait OfferSource: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedOffers, SourceError>;
}
