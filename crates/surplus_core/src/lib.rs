//! Surplus watch core: offer model, filter and diff rules, and the pure
//! presentation state machine.
mod diff;
mod effect;
mod error;
mod filter;
mod location;
mod msg;
mod offer;
mod poll_state;
mod report;
mod search;
mod settings;
mod state;
mod update;
mod view_model;

pub use diff::{diff_new_offers, offer_ids};
pub use effect::{Effect, ShutdownReason};
pub use error::ConfigError;
pub use filter::{filter_offers, FilterCriteria, DEFAULT_MAX_PRICE, DEFAULT_MIN_PRICE};
pub use location::{Coordinates, Location, DEFAULT_RADIUS_KM};
pub use msg::Msg;
pub use offer::{Offer, OfferId, PickupWindow, Price};
pub use poll_state::PollState;
pub use report::{distinct_vendors, CycleReport};
pub use search::SearchSnapshot;
pub use settings::{refresh_interval_from_secs, SettingsSnapshot, DEFAULT_REFRESH_INTERVAL_SECS};
pub use state::{AppState, SessionState, Severity};
pub use update::update;
pub use view_model::{AppViewModel, DraftView, OfferDetailView, OfferRowView, StatusLine};
