use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};

use crate::{Offer, OfferId};

/// Result of one successful cycle, as handed to the presentation side.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub filtered: Vec<Offer>,
    /// Subset of `filtered` that was absent from the previous cycle.
    pub new_offers: Vec<Offer>,
    /// Distinct vendor names of the unfiltered fetch, sorted.
    pub vendors: Vec<String>,
    pub polled_at: DateTime<Utc>,
    /// Records the source could not turn into an `Offer`.
    pub skipped_records: usize,
    /// How many earlier reports were folded into this one.
    pub coalesced: usize,
}

impl CycleReport {
    /// Folds a newer report into this one. The newer snapshot wins; new offers
    /// from both are kept, each id once.
    pub fn absorb(&mut self, newer: CycleReport) {
        let mut seen: HashSet<OfferId> = self.new_offers.iter().map(|o| o.id.clone()).collect();
        for offer in newer.new_offers {
            if seen.insert(offer.id.clone()) {
                self.new_offers.push(offer);
            }
        }
        self.filtered = newer.filtered;
        self.vendors = newer.vendors;
        self.polled_at = newer.polled_at;
        self.skipped_records += newer.skipped_records;
        self.coalesced += newer.coalesced + 1;
    }
}

pub fn distinct_vendors(offers: &[Offer]) -> Vec<String> {
    offers
        .iter()
        .map(|offer| offer.vendor_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
