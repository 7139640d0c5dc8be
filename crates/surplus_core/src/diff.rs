use std::collections::HashSet;

use crate::{Offer, OfferId};

/// Returns the offers in `current` whose id is not in `baseline`, in input
/// order.
///
/// `None` means no successful cycle has run under the current search yet:
/// that first population of offers is a baseline, not a batch of new
/// arrivals. An empty baseline is a real one, so every current offer is new.
pub fn diff_new_offers(baseline: Option<&HashSet<OfferId>>, current: &[Offer]) -> Vec<Offer> {
    let Some(previous_ids) = baseline else {
        return Vec::new();
    };
    current
        .iter()
        .filter(|offer| !previous_ids.contains(&offer.id))
        .cloned()
        .collect()
}

/// Id set of `offers`, used as the baseline for the next diff.
pub fn offer_ids(offers: &[Offer]) -> HashSet<OfferId> {
    offers.iter().map(|offer| offer.id.clone()).collect()
}
