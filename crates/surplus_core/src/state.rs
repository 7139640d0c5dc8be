use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::view_model::{AppViewModel, DraftView, OfferDetailView, OfferRowView, StatusLine};
use crate::{
    refresh_interval_from_secs, ConfigError, Coordinates, CycleReport, FilterCriteria, Location,
    Offer, OfferId, SettingsSnapshot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Watching,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Keyword field of the form.
#[derive(Debug, Clone, PartialEq)]
enum KeywordsDraft {
    /// The applied list, untouched. A multi-word keyword stays one keyword.
    Applied(Vec<String>),
    /// Typed by the user; split on whitespace when applied.
    Typed(String),
}

impl KeywordsDraft {
    fn display(&self) -> String {
        match self {
            KeywordsDraft::Typed(text) => text.clone(),
            KeywordsDraft::Applied(keywords) => keywords
                .iter()
                .map(|k| {
                    if k.contains(char::is_whitespace) {
                        format!("\"{k}\"")
                    } else {
                        k.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Form contents as the user typed them. Only validated on apply/save.
#[derive(Debug, Clone, PartialEq)]
struct SettingsDraft {
    keywords: KeywordsDraft,
    vendor: Option<String>,
    min_price: String,
    max_price: String,
    radius_km: String,
    refresh_interval_secs: String,
    coordinates: Option<Coordinates>,
}

impl SettingsDraft {
    fn from_settings(settings: &SettingsSnapshot) -> Self {
        let criteria = &settings.criteria;
        Self {
            keywords: KeywordsDraft::Applied(criteria.keywords().iter().cloned().collect()),
            vendor: criteria.vendor().map(ToOwned::to_owned),
            min_price: criteria.min_price().to_string(),
            max_price: criteria.max_price().to_string(),
            radius_km: settings.location.radius_km.to_string(),
            refresh_interval_secs: settings.refresh_interval_secs.to_string(),
            coordinates: settings.location.coordinates,
        }
    }

    fn validate(&self) -> Result<SettingsSnapshot, ConfigError> {
        let vendor = self.vendor.as_deref();
        let criteria = match &self.keywords {
            KeywordsDraft::Applied(keywords) => FilterCriteria::build_with_keywords(
                keywords,
                vendor,
                &self.min_price,
                &self.max_price,
            )?,
            KeywordsDraft::Typed(text) => {
                FilterCriteria::build(text, vendor, &self.min_price, &self.max_price)?
            }
        };
        let radius_km = self
            .radius_km
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidRadius)?;
        let location = Location {
            coordinates: self.coordinates,
            radius_km,
        };
        location.validate()?;
        let refresh_interval_secs = self
            .refresh_interval_secs
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidRefreshInterval)?;
        refresh_interval_from_secs(refresh_interval_secs)?;

        Ok(SettingsSnapshot {
            refresh_interval_secs,
            location,
            criteria,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    session: SessionState,
    applied: SettingsSnapshot,
    draft: SettingsDraft,
    offers: Vec<Offer>,
    latest_new: HashSet<OfferId>,
    vendors: Vec<String>,
    last_updated: Option<DateTime<Utc>>,
    cycles_seen: u64,
    notified_total: u64,
    skipped_total: u64,
    selected: Option<OfferId>,
    status: Option<StatusLine>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SettingsSnapshot::default())
    }
}

impl AppState {
    pub fn new(settings: SettingsSnapshot) -> Self {
        Self {
            session: SessionState::Watching,
            draft: SettingsDraft::from_settings(&settings),
            applied: settings,
            offers: Vec::new(),
            latest_new: HashSet::new(),
            vendors: Vec::new(),
            last_updated: None,
            cycles_seen: 0,
            notified_total: 0,
            skipped_total: 0,
            selected: None,
            status: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let rows = self
            .offers
            .iter()
            .map(|offer| OfferRowView {
                id: offer.id.clone(),
                vendor: offer.vendor_name.clone(),
                price: offer.price.to_string(),
                quantity: offer.quantity_available,
                pickup: offer
                    .pickup_window
                    .map(|w| w.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                distance_km: offer.distance_km,
                is_new: self.latest_new.contains(&offer.id),
            })
            .collect();

        let selected = self.selected.as_ref().and_then(|id| {
            self.offers
                .iter()
                .find(|offer| &offer.id == id)
                .map(OfferDetailView::from_offer)
        });

        AppViewModel {
            session: self.session,
            rows,
            vendor_choices: self.vendors.clone(),
            last_updated: self.last_updated,
            cycles_seen: self.cycles_seen,
            notified_total: self.notified_total,
            skipped_total: self.skipped_total,
            status: self.status.clone(),
            selected,
            draft: DraftView {
                keywords: self.draft.keywords.display(),
                vendor: self.draft.vendor.clone(),
                min_price: self.draft.min_price.clone(),
                max_price: self.draft.max_price.clone(),
                radius_km: self.draft.radius_km.clone(),
                refresh_interval_secs: self.draft.refresh_interval_secs.clone(),
                coordinates: self.draft.coordinates,
            },
            dirty: self.dirty,
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    /// Settings currently in effect in the scheduler.
    pub fn applied(&self) -> &SettingsSnapshot {
        &self.applied
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn apply_report(&mut self, report: &CycleReport) {
        self.latest_new = report.new_offers.iter().map(|o| o.id.clone()).collect();
        self.offers = report.filtered.clone();
        self.vendors = report.vendors.clone();
        self.last_updated = Some(report.polled_at);
        self.cycles_seen += 1 + report.coalesced as u64;
        self.notified_total += report.new_offers.len() as u64;
        self.skipped_total += report.skipped_records as u64;
        if let Some(id) = &self.selected {
            if !self.offers.iter().any(|offer| &offer.id == id) {
                self.selected = None;
            }
        }
        self.mark_dirty();
    }

    pub(crate) fn stop(&mut self) {
        if self.session != SessionState::Stopped {
            self.session = SessionState::Stopped;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_status(&mut self, severity: Severity, text: impl Into<String>) {
        self.status = Some(StatusLine {
            severity,
            text: text.into(),
        });
        self.mark_dirty();
    }

    pub(crate) fn has_offer(&self, id: &OfferId) -> bool {
        self.offers.iter().any(|offer| &offer.id == id)
    }

    pub(crate) fn select(&mut self, id: OfferId) {
        if self.selected.as_ref() != Some(&id) {
            self.selected = Some(id);
            self.mark_dirty();
        }
    }

    pub(crate) fn edit_draft(&mut self, edit: DraftEdit) {
        let draft = &mut self.draft;
        match edit {
            DraftEdit::Keywords(text) => draft.keywords = KeywordsDraft::Typed(text),
            DraftEdit::Vendor(vendor) => draft.vendor = vendor,
            DraftEdit::PriceBounds { min, max } => {
                draft.min_price = min;
                draft.max_price = max;
            }
            DraftEdit::Radius(text) => draft.radius_km = text,
            DraftEdit::RefreshInterval(text) => draft.refresh_interval_secs = text,
            DraftEdit::Coordinates(coordinates) => draft.coordinates = coordinates,
        }
        self.mark_dirty();
    }

    pub(crate) fn validate_draft(&self) -> Result<SettingsSnapshot, ConfigError> {
        self.draft.validate()
    }

    pub(crate) fn set_applied(&mut self, settings: SettingsSnapshot) {
        self.draft = SettingsDraft::from_settings(&settings);
        self.applied = settings;
        self.mark_dirty();
    }
}

pub(crate) enum DraftEdit {
    Keywords(String),
    Vendor(Option<String>),
    PriceBounds { min: String, max: String },
    Radius(String),
    RefreshInterval(String),
    Coordinates(Option<Coordinates>),
}
