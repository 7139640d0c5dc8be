//! Surplus watch engine: offer source, poll cycle, scheduler and the
//! hand-off to the presentation loop.
mod backoff;
mod cycle;
mod decode;
mod handoff;
mod marketplace;
mod notify;
mod persist;
mod scheduler;
mod source;

pub use backoff::BackoffPolicy;
pub use cycle::{run_cycle, CycleFailure, CycleOutcome};
pub use decode::decode_offers;
pub use handoff::{
    handoff, HandoffReceiver, HandoffSender, SchedulerEvent, DEFAULT_HANDOFF_CAPACITY,
};
pub use marketplace::{MarketplaceClient, MarketplaceSettings};
pub use notify::{dispatch_notification, Notifier, NotifyError, OfferNotice};
pub use persist::{ensure_dir, write_atomically, PersistError};
pub use scheduler::{
    Scheduler, SchedulerConfig, SchedulerHandle, SchedulerPhase, SchedulerThread,
};
pub use source::{FetchRequest, FetchedOffers, OfferSource, SourceError};
