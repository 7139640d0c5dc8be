use surplus_core::{Offer, PickupWindow, Price};
use surplus_logging::{watch_info, watch_warn};
use thiserror::Error;

/// What the user is alerted about for one new offer.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferNotice {
    pub title: String,
    pub vendor_name: String,
    pub price: Price,
    pub pickup_window: Option<PickupWindow>,
}

impl OfferNotice {
    pub fn for_offer(offer: &Offer) -> Self {
        Self {
            title: "New surplus offer!".to_string(),
            vendor_name: offer.vendor_name.clone(),
            price: offer.price.clone(),
            pickup_window: offer.pickup_window,
        }
    }

    pub fn body(&self) -> String {
        match &self.pickup_window {
            Some(window) => format!(
                "{}\nPrice: {}\nPickup: {}",
                self.vendor_name, self.price, window
            ),
            None => format!("{}\nPrice: {}", self.vendor_name, self.price),
        }
    }
}

#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

pub trait Notifier {
    fn notify(&self, notice: &OfferNotice) -> Result<(), NotifyError>;
}

/// Fire-and-forget delivery: a failing notifier is logged and otherwise
/// ignored.
pub fn dispatch_notification(notifier: &dyn Notifier, offer: &Offer) {
    let notice = OfferNotice::for_offer(offer);
    watch_info!("New offer {} from {}", offer.id, offer.vendor_name);
    if let Err(err) = notifier.notify(&notice) {
        watch_warn!("Could not notify about offer {}: {}", offer.id, err);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use surplus_core::OfferId;

    use super::*;

    struct Recording {
        seen: RefCell<Vec<String>>,
        fail: bool,
    }

    impl Notifier for Recording {
        fn notify(&self, notice: &OfferNotice) -> Result<(), NotifyError> {
            self.seen.borrow_mut().push(notice.vendor_name.clone());
            if self.fail {
                Err(NotifyError("backend offline".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn offer() -> Offer {
        Offer {
            id: OfferId::new("1"),
            vendor_name: "Green Bakery".to_string(),
            address: None,
            price: Price::new(1299, "PLN"),
            quantity_available: 1,
            pickup_window: None,
            distance_km: 0.3,
        }
    }

    #[test]
    fn body_contains_vendor_and_price() {
        let notice = OfferNotice::for_offer(&offer());
        assert_eq!(notice.body(), "Green Bakery\nPrice: 12.99 PLN");
    }

    #[test]
    fn failing_notifier_does_not_propagate() {
        let notifier = Recording {
            seen: RefCell::new(Vec::new()),
            fail: true,
        };
        dispatch_notification(&notifier, &offer());
        assert_eq!(notifier.seen.borrow().as_slice(), ["Green Bakery".to_string()]);
    }
}
