use crate::state::DraftEdit;
use crate::{AppState, Coordinates, Effect, Msg, Severity, SessionState, ShutdownReason};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::CycleCompleted(report) => {
            state.apply_report(&report);
            report.new_offers.into_iter().map(Effect::Notify).collect()
        }
        Msg::AuthenticationRequired(reason) => {
            state.set_status(
                Severity::Error,
                format!("Marketplace login required: {reason}"),
            );
            state.stop();
            vec![Effect::Shutdown {
                reason: ShutdownReason::AuthenticationRequired,
            }]
        }
        Msg::SchedulerStopped => {
            state.stop();
            Vec::new()
        }
        Msg::KeywordsEdited(text) => {
            state.edit_draft(DraftEdit::Keywords(text));
            Vec::new()
        }
        Msg::VendorSelected(vendor) => {
            state.edit_draft(DraftEdit::Vendor(vendor));
            Vec::new()
        }
        Msg::PriceBoundsEdited { min, max } => {
            state.edit_draft(DraftEdit::PriceBounds { min, max });
            Vec::new()
        }
        Msg::RadiusEdited(text) => {
            state.edit_draft(DraftEdit::Radius(text));
            Vec::new()
        }
        Msg::RefreshIntervalEdited(text) => {
            state.edit_draft(DraftEdit::RefreshInterval(text));
            Vec::new()
        }
        Msg::LocationSet { lat, lng } => {
            state.edit_draft(DraftEdit::Coordinates(Some(Coordinates { lat, lng })));
            Vec::new()
        }
        Msg::LocationCleared => {
            state.edit_draft(DraftEdit::Coordinates(None));
            Vec::new()
        }
        Msg::ApplyClicked => apply_draft(&mut state, false),
        Msg::SaveClicked => apply_draft(&mut state, true),
        Msg::ConfigSaved => {
            state.set_status(Severity::Info, "Settings saved");
            Vec::new()
        }
        Msg::ConfigSaveFailed(reason) => {
            state.set_status(Severity::Error, format!("Saving settings failed: {reason}"));
            Vec::new()
        }
        Msg::RefreshClicked => {
            if state.session() == SessionState::Watching {
                vec![Effect::RunNow]
            } else {
                Vec::new()
            }
        }
        Msg::OfferSelected(id) => {
            if state.has_offer(&id) {
                state.select(id);
            }
            Vec::new()
        }
        Msg::QuitRequested => vec![Effect::Shutdown {
            reason: ShutdownReason::UserRequested,
        }],
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Validates the draft; on success emits the effects needed to bring the
/// scheduler in line with it. Invalid input leaves the active settings alone.
fn apply_draft(state: &mut AppState, save: bool) -> Vec<Effect> {
    let settings = match state.validate_draft() {
        Ok(settings) => settings,
        Err(err) => {
            state.set_status(Severity::Error, format!("Invalid settings: {err}"));
            return Vec::new();
        }
    };

    let previous = state.applied();
    let mut effects = Vec::new();
    if settings.refresh_interval_secs != previous.refresh_interval_secs {
        effects.push(Effect::SetRefreshInterval(settings.refresh_interval()));
    }
    if settings.location != previous.location || settings.criteria != previous.criteria {
        effects.push(Effect::ApplySearch {
            location: settings.location.clone(),
            criteria: settings.criteria.clone(),
        });
    }
    if save {
        effects.push(Effect::SaveConfig(settings.clone()));
    }

    let message = if effects.is_empty() {
        "Settings unchanged"
    } else {
        "Settings applied"
    };
    state.set_applied(settings);
    state.set_status(Severity::Info, message);
    effects
}
