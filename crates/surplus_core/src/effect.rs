use std::time::Duration;

use crate::{FilterCriteria, Location, Offer, SettingsSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Notify(Offer),
    ApplySearch {
        location: Location,
        criteria: FilterCriteria,
    },
    SetRefreshInterval(Duration),
    RunNow,
    SaveConfig(SettingsSnapshot),
    Shutdown { reason: ShutdownReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    UserRequested,
    AuthenticationRequired,
}
