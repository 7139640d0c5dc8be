use std::collections::BTreeSet;

use crate::{ConfigError, Offer};

pub const DEFAULT_MIN_PRICE: f64 = 0.0;
pub const DEFAULT_MAX_PRICE: f64 = 1000.0;

/// Validated filter snapshot. Built once per user edit and shared read-only
/// with every cycle that runs under it.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    keywords: BTreeSet<String>,
    vendor: Option<String>,
    min_price: f64,
    max_price: f64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            keywords: BTreeSet::new(),
            vendor: None,
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
        }
    }
}

impl FilterCriteria {
    /// Builds criteria from raw form input.
    ///
    /// `keywords` is split on whitespace and lower-cased. Blank price text
    /// falls back to the default bound; anything else must parse.
    pub fn build(
        keywords: &str,
        vendor: Option<&str>,
        min_price: &str,
        max_price: &str,
    ) -> Result<Self, ConfigError> {
        Self::build_with_keywords(keywords.split_whitespace(), vendor, min_price, max_price)
    }

    /// Like [`FilterCriteria::build`] but with keywords that are already a
    /// list, so a multi-word keyword stays one keyword.
    pub fn build_with_keywords<I, S>(
        keywords: I,
        vendor: Option<&str>,
        min_price: &str,
        max_price: &str,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let min = parse_price("minimum", min_price, DEFAULT_MIN_PRICE)?;
        let max = parse_price("maximum", max_price, DEFAULT_MAX_PRICE)?;
        Self::from_parts(keywords, vendor, min, max)
    }

    /// Builds criteria from already-numeric bounds (config file values).
    pub fn from_parts<I, S>(
        keywords: I,
        vendor: Option<&str>,
        min_price: f64,
        max_price: f64,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        check_bound("minimum", min_price)?;
        check_bound("maximum", max_price)?;
        if min_price > max_price {
            return Err(ConfigError::InvertedPriceRange {
                min: min_price,
                max: max_price,
            });
        }

        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        let vendor = vendor
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToOwned::to_owned);

        Ok(Self {
            keywords,
            vendor,
            min_price,
            max_price,
        })
    }

    pub fn keywords(&self) -> &BTreeSet<String> {
        &self.keywords
    }

    pub fn vendor(&self) -> Option<&str> {
        self.vendor.as_deref()
    }

    pub fn min_price(&self) -> f64 {
        self.min_price
    }

    pub fn max_price(&self) -> f64 {
        self.max_price
    }

    /// Keyword, then vendor, then price. All three must pass.
    pub fn matches(&self, offer: &Offer) -> bool {
        self.keyword_matches(offer) && self.vendor_matches(offer) && self.price_matches(offer)
    }

    fn keyword_matches(&self, offer: &Offer) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let name = offer.vendor_name.to_lowercase();
        self.keywords.iter().any(|k| name.contains(k.as_str()))
    }

    fn vendor_matches(&self, offer: &Offer) -> bool {
        self.vendor
            .as_deref()
            .map_or(true, |vendor| offer.vendor_name == vendor)
    }

    fn price_matches(&self, offer: &Offer) -> bool {
        let price = offer.price_decimal();
        self.min_price <= price && price <= self.max_price
    }
}

/// Applies `criteria` to `offers`, preserving input order.
pub fn filter_offers(offers: &[Offer], criteria: &FilterCriteria) -> Vec<Offer> {
    offers
        .iter()
        .filter(|offer| criteria.matches(offer))
        .cloned()
        .collect()
}

fn parse_price(field: &'static str, raw: &str, default: f64) -> Result<f64, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    // Accept a decimal comma as typed in many locales.
    let normalized = trimmed.replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ConfigError::InvalidPrice {
            field,
            value: trimmed.to_string(),
        }),
    }
}

fn check_bound(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::InvalidPrice {
            field,
            value: value.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ConfigError::NegativePrice { field });
    }
    Ok(())
}
