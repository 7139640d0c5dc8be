#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Scheduler delivered a finished cycle.
    CycleCompleted(crate::CycleReport),
    /// Scheduler stopped because the marketplace rejected the credentials.
    AuthenticationRequired(String),
    /// Scheduler reached its terminal state.
    SchedulerStopped,
    /// User edited the keyword box.
    KeywordsEdited(String),
    /// User picked a vendor from the list, or cleared the choice.
    VendorSelected(Option<String>),
    /// User edited the price bounds.
    PriceBoundsEdited { min: String, max: String },
    /// User edited the search radius.
    RadiusEdited(String),
    /// User edited the refresh interval (seconds).
    RefreshIntervalEdited(String),
    /// A resolved search centre.
    LocationSet { lat: f64, lng: f64 },
    LocationCleared,
    /// User confirmed the edited settings.
    ApplyClicked,
    /// User asked to apply and persist the edited settings.
    SaveClicked,
    ConfigSaved,
    ConfigSaveFailed(String),
    /// User asked for an immediate poll.
    RefreshClicked,
    OfferSelected(crate::OfferId),
    QuitRequested,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
