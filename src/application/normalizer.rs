//! # Field Normalizer
//!
//! Turns raw text fields scraped from product tiles (price labels, unit price
//! lines, product URLs) into typed values. Every extraction is best-effort:
//! a pattern that does not match, or a number that does not parse, yields a
//! default or `None` and never an error.

use regex::Regex;
use tracing::{debug, warn};

/// Unit rate read from a unit price line such as `$3.50 per kg`
#[derive(Debug, Clone, PartialEq)]
pub struct UnitRate {
    pub value: f64,
    /// Lower-cased unit word (`kg`, `100g`, `1l`, `each`, ...)
    pub unit: String,
}

/// Compiled extraction patterns for scraped text fields
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    price_regex: Regex,
    unit_rate_regex: Regex,
    url_id_regex: Regex,
}

impl FieldNormalizer {
    /// Creates a normalizer with the retailer's text patterns
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            price_regex: Regex::new(r"(\d+\.\d+|\d+)")?,
            unit_rate_regex: Regex::new(r"\$([\d\.]+)\s+per\s+(\w+)")?,
            url_id_regex: Regex::new(r"-(\d+)$")?,
        })
    }

    /// First integer-or-decimal number in a price label, `0.0` when there is none.
    ///
    /// Currency symbols are stripped first, so `"$4.50"` and `"4.50 ea"` both read `4.5`.
    pub fn extract_price(&self, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }

        let cleaned = text.replace('$', "");
        self.price_regex
            .captures(&cleaned)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .unwrap_or_else(|| {
                debug!("No price found in '{}'", text);
                0.0
            })
    }

    /// `$<number> per <unit>` rate embedded in a unit price line
    pub fn extract_unit_rate(&self, unit_price: &str) -> Option<UnitRate> {
        let caps = self.unit_rate_regex.captures(unit_price)?;
        let raw_value = caps.get(1)?.as_str();
        let unit = caps.get(2)?.as_str().to_lowercase();

        match raw_value.parse::<f64>() {
            Ok(value) if value.is_finite() => Some(UnitRate { value, unit }),
            Ok(_) | Err(_) => {
                warn!("Error extracting unit price rate from '{}'", unit_price);
                None
            }
        }
    }

    /// Trailing numeric id of a product URL (`.../product/milk-2l-8150288` → `8150288`)
    pub fn derive_id_from_url(&self, url: &str) -> Option<String> {
        self.url_id_regex
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

/// Text before the first `|`, trimmed. Drops a trailing "was" price segment.
pub fn strip_was_price_suffix(unit_price: &str) -> &str {
    unit_price.split('|').next().unwrap_or_default().trim()
}

/// Trimmed special-offer text, `None` when nothing is left
pub fn normalize_special_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Round to cents
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Saving derived from the was price.
///
/// Only fills a zero saving when both prices are positive; a saving that is
/// already set is returned untouched. Never negative.
pub fn derive_save_value(save_value: f64, was_price_value: f64, price_value: f64) -> f64 {
    if save_value == 0.0 && was_price_value > 0.0 && price_value > 0.0 {
        round_to_cents(was_price_value - price_value).max(0.0)
    } else {
        save_value
    }
}
