use chrono::{DateTime, Utc};

use crate::{Coordinates, Offer, OfferId, SessionState, Severity};

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub session: SessionState,
    pub rows: Vec<OfferRowView>,
    pub vendor_choices: Vec<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub cycles_seen: u64,
    pub notified_total: u64,
    pub skipped_total: u64,
    pub status: Option<StatusLine>,
    pub selected: Option<OfferDetailView>,
    pub draft: DraftView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OfferRowView {
    pub id: OfferId,
    pub vendor: String,
    pub price: String,
    pub quantity: u32,
    pub pickup: String,
    pub distance_km: f64,
    /// Reported as new by the most recent cycle.
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub severity: Severity,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OfferDetailView {
    pub id: OfferId,
    pub vendor: String,
    pub address: String,
    pub price: String,
    pub quantity: u32,
    pub pickup: String,
    pub distance_km: f64,
}

impl OfferDetailView {
    pub(crate) fn from_offer(offer: &Offer) -> Self {
        Self {
            id: offer.id.clone(),
            vendor: offer.vendor_name.clone(),
            address: offer
                .address
                .clone()
                .unwrap_or_else(|| "no address".to_string()),
            price: offer.price.to_string(),
            quantity: offer.quantity_available,
            pickup: offer
                .pickup_window
                .map(|w| w.to_string())
                .unwrap_or_else(|| "-".to_string()),
            distance_km: offer.distance_km,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftView {
    pub keywords: String,
    pub vendor: Option<String>,
    pub min_price: String,
    pub max_price: String,
    pub radius_km: String,
    pub refresh_interval_secs: String,
    pub coordinates: Option<Coordinates>,
}
