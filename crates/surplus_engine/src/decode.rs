//! Marketplace payload decoding.
//!
//! The response is parsed loosely first so that one malformed record costs
//! only that record. Each entry is then validated into an [`Offer`].

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use surplus_core::{Offer, OfferId, PickupWindow, Price};
use surplus_logging::watch_warn;

use crate::{FetchedOffers, SourceError};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    item: RawItem,
    store: RawStore,
    #[serde(default)]
    items_available: u32,
    pickup_interval: Option<RawInterval>,
    #[serde(default)]
    distance: f64,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    item_id: String,
    price_including_taxes: RawPrice,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    code: String,
    minor_units: i64,
}

#[derive(Debug, Deserialize)]
struct RawStore {
    store_name: String,
    store_location: Option<RawStoreLocation>,
}

#[derive(Debug, Deserialize)]
struct RawStoreLocation {
    address: Option<RawAddress>,
}

#[derive(Debug, Deserialize)]
struct RawAddress {
    address_line: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Decodes a full response body. Only an unreadable envelope fails the call.
pub fn decode_offers(body: &[u8]) -> Result<FetchedOffers, SourceError> {
    let envelope: Envelope = serde_json::from_slice(body)
        .map_err(|err| SourceError::InvalidResponse(err.to_string()))?;

    let mut fetched = FetchedOffers::default();
    for (index, value) in envelope.items.into_iter().enumerate() {
        match decode_entry(value) {
            Ok(offer) => fetched.offers.push(offer),
            Err(reason) => {
                watch_warn!("Skipping malformed offer record #{}: {}", index, reason);
                fetched.skipped += 1;
            }
        }
    }
    Ok(fetched)
}

fn decode_entry(value: Value) -> Result<Offer, String> {
    let raw: RawEntry = serde_json::from_value(value).map_err(|err| err.to_string())?;

    let item_id = raw.item.item_id.trim();
    if item_id.is_empty() {
        return Err("empty item_id".to_string());
    }
    let vendor_name = raw.store.store_name.trim();
    if vendor_name.is_empty() {
        return Err(format!("item {item_id} has an empty store_name"));
    }
    let price = raw.item.price_including_taxes;
    if price.minor_units < 0 {
        return Err(format!("item {item_id} has a negative price"));
    }
    if !raw.distance.is_finite() || raw.distance < 0.0 {
        return Err(format!("item {item_id} has an invalid distance"));
    }
    let pickup_window = match raw.pickup_interval {
        Some(interval) if interval.end < interval.start => {
            return Err(format!("item {item_id} has a pickup window ending before it starts"));
        }
        Some(interval) => Some(PickupWindow {
            start: interval.start,
            end: interval.end,
        }),
        None => None,
    };

    Ok(Offer {
        id: offer_id(item_id, pickup_window.as_ref()),
        vendor_name: vendor_name.to_string(),
        address: raw
            .store
            .store_location
            .and_then(|location| location.address)
            .and_then(|address| address.address_line),
        price: Price::new(price.minor_units, price.code),
        quantity_available: raw.items_available,
        pickup_window,
        distance_km: raw.distance,
    })
}

/// The same bag offered for a later pickup window is a different offer.
fn offer_id(item_id: &str, window: Option<&PickupWindow>) -> OfferId {
    match window {
        Some(window) => OfferId::new(format!("{item_id}@{}", window.start.to_rfc3339())),
        None => OfferId::new(item_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, store: &str, minor_units: i64) -> Value {
        serde_json::json!({
            "item": {
                "item_id": id,
                "price_including_taxes": { "code": "PLN", "minor_units": minor_units, "decimals": 2 }
            },
            "store": {
                "store_name": store,
                "store_location": { "address": { "address_line": "Marszalkowska 1, Warszawa" } }
            },
            "items_available": 2,
            "pickup_interval": { "start": "2026-03-01T18:00:00Z", "end": "2026-03-01T18:30:00Z" },
            "distance": 1.5
        })
    }

    #[test]
    fn decodes_a_complete_record() {
        let body = serde_json::json!({ "items": [entry("42", "Green Bakery", 1299)] });
        let fetched = decode_offers(body.to_string().as_bytes()).unwrap();

        assert_eq!(fetched.skipped, 0);
        let offer = &fetched.offers[0];
        assert_eq!(offer.id.as_str(), "42@2026-03-01T18:00:00+00:00");
        assert_eq!(offer.vendor_name, "Green Bakery");
        assert_eq!(offer.price, Price::new(1299, "PLN"));
        assert_eq!(offer.quantity_available, 2);
        assert_eq!(offer.address.as_deref(), Some("Marszalkowska 1, Warszawa"));
        assert_eq!(offer.distance_km, 1.5);
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let body = serde_json::json!({
            "items": [
                entry("1", "A", 100),
                { "item": { "item_id": "2" } },
                entry("3", "", 100),
                entry("4", "D", -5),
                entry("5", "E", 500),
            ]
        });
        let fetched = decode_offers(body.to_string().as_bytes()).unwrap();
        let ids: Vec<_> = fetched
            .offers
            .iter()
            .map(|o| o.id.as_str().split('@').next().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "5"]);
        assert_eq!(fetched.skipped, 3);
    }

    #[test]
    fn missing_pickup_window_uses_bare_item_id() {
        let mut raw = entry("7", "Cafe", 900);
        raw.as_object_mut().unwrap().remove("pickup_interval");
        let body = serde_json::json!({ "items": [raw] });
        let fetched = decode_offers(body.to_string().as_bytes()).unwrap();
        assert_eq!(fetched.offers[0].id.as_str(), "7");
        assert!(fetched.offers[0].pickup_window.is_none());
    }

    #[test]
    fn unreadable_envelope_is_an_invalid_response() {
        let err = decode_offers(b"<html>maintenance</html>").unwrap_err();
        assert!(matches!(err, SourceError::InvalidResponse(_)));
    }

    #[test]
    fn empty_items_list_is_fine() {
        let fetched = decode_offers(br#"{"items": []}"#).unwrap();
        assert!(fetched.offers.is_empty());
        assert_eq!(fetched.skipped, 0);
    }
}
