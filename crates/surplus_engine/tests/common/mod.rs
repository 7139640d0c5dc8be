#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use surplus_core::{Offer, OfferId, Price};
use surplus_engine::{FetchRequest, FetchedOffers, OfferSource, SourceError};

pub fn init_logging() {
    surplus_logging::initialize_for_tests();
}

pub fn offer(id: &str) -> Offer {
    offer_from(id, &format!("Vendor {id}"), 1000)
}

pub fn offer_from(id: &str, vendor: &str, minor_units: i64) -> Offer {
    Offer {
        id: OfferId::new(id),
        vendor_name: vendor.to_string(),
        address: None,
        price: Price::new(minor_units, "PLN"),
        quantity_available: 1,
        pickup_window: None,
        distance_km: 1.0,
    }
}

pub fn offers(ids: &[&str]) -> Vec<Offer> {
    ids.iter().map(|id| offer(id)).collect()
}

pub fn ids(offers: &[Offer]) -> Vec<String> {
    offers.iter().map(|o| o.id.as_str().to_string()).collect()
}

pub enum Scripted {
    Offers(Vec<Offer>),
    Skipping(Vec<Offer>, usize),
    Fail(SourceError),
    Hang,
}

/// Offer source replaying a script. Once the script runs out the last
/// successful response repeats.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Scripted>>,
    last: Mutex<FetchedOffers>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: AtomicUsize,
    requests: Mutex<Vec<FetchRequest>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Scripted>) -> Arc<Self> {
        Self::with_delay(script, Duration::ZERO)
    }

    pub fn with_delay(script: Vec<Scripted>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(FetchedOffers::default()),
            delay,
            calls: AtomicUsize::new(0),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl OfferSource for ScriptedSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedOffers, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(self.in_flight.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Offers(offers)) => self.remember(FetchedOffers { offers, skipped: 0 }),
            Some(Scripted::Skipping(offers, skipped)) => {
                self.remember(FetchedOffers { offers, skipped })
            }
            Some(Scripted::Fail(error)) => Err(error),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Ok(self.last.lock().unwrap().clone()),
        }
    }
}

impl ScriptedSource {
    fn remember(&self, fetched: FetchedOffers) -> Result<FetchedOffers, SourceError> {
        *self.last.lock().unwrap() = fetched.clone();
        Ok(fetched)
    }
}
