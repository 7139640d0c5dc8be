use std::time::Duration;

use chrono::Utc;
use surplus_core::{
    diff_new_offers, distinct_vendors, filter_offers, offer_ids, CycleReport, PollState,
    SearchSnapshot,
};
use surplus_logging::{watch_debug, watch_info};

use crate::{FetchRequest, OfferSource, SourceError};

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// No search centre configured; nothing was fetched and state is untouched.
    NoLocation,
    Completed { report: CycleReport, state: PollState },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleFailure {
    pub error: SourceError,
    /// Previous state with the failure counted.
    pub state: PollState,
}

/// One fetch → filter → diff pass. The caller's `state` is never touched;
/// the successor state is returned so it can be committed in one step.
pub async fn run_cycle(
    source: &dyn OfferSource,
    search: &SearchSnapshot,
    state: &PollState,
    timeout: Duration,
) -> Result<CycleOutcome, CycleFailure> {
    let Some(coordinates) = search.location.coordinates else {
        watch_debug!("No location set; skipping fetch");
        return Ok(CycleOutcome::NoLocation);
    };

    let request = FetchRequest {
        coordinates,
        radius_km: search.location.radius_km,
        timeout,
    };
    let fetched = match tokio::time::timeout(timeout, source.fetch(&request)).await {
        Ok(Ok(fetched)) => fetched,
        Ok(Err(error)) => {
            return Err(CycleFailure {
                error,
                state: state.failed(),
            })
        }
        Err(_elapsed) => {
            return Err(CycleFailure {
                error: SourceError::Timeout,
                state: state.failed(),
            })
        }
    };

    let filtered = filter_offers(&fetched.offers, &search.criteria);
    let new_offers = diff_new_offers(state.baseline_for(search.revision), &filtered);
    let polled_at = Utc::now();

    watch_info!(
        "Fetched {} offers, {} after filters, {} new, {} skipped",
        fetched.offers.len(),
        filtered.len(),
        new_offers.len(),
        fetched.skipped
    );

    let next_state = state.succeeded(offer_ids(&filtered), search.revision, polled_at);
    let report = CycleReport {
        vendors: distinct_vendors(&fetched.offers),
        filtered,
        new_offers,
        polled_at,
        skipped_records: fetched.skipped,
        coalesced: 0,
    };

    Ok(CycleOutcome::Completed {
        report,
        state: next_state,
    })
}
