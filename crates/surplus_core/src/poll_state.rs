use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::OfferId;

/// The only state carried from one cycle to the next.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollState {
    /// Filtered ids of the most recent successful cycle.
    pub previous_offer_ids: HashSet<OfferId>,
    pub last_poll_time: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    /// Search revision `previous_offer_ids` was computed under.
    pub baseline_revision: Option<u64>,
}

impl PollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Baseline to diff against for `revision`. A search edit since the last
    /// success invalidates the stored ids.
    pub fn baseline_for(&self, revision: u64) -> Option<&HashSet<OfferId>> {
        if self.baseline_revision == Some(revision) {
            Some(&self.previous_offer_ids)
        } else {
            None
        }
    }

    pub fn succeeded(
        &self,
        ids: HashSet<OfferId>,
        revision: u64,
        polled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            previous_offer_ids: ids,
            last_poll_time: Some(polled_at),
            consecutive_failures: 0,
            baseline_revision: Some(revision),
        }
    }

    pub fn failed(&self) -> Self {
        Self {
            consecutive_failures: self.consecutive_failures.saturating_add(1),
            ..self.clone()
        }
    }
}
