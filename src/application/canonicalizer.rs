//! # Record Canonicalizer
//!
//! Maps raw scraped records onto the fixed [`CanonicalProduct`] schema.
//! Each field is coerced on its own with an explicit default, so any
//! combination of missing, null or oddly typed fields still produces a
//! product. Only a missing or blank title rejects a record.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info};

use super::normalizer::{self, FieldNormalizer};
use crate::domain::constants::vendor;
use crate::domain::product::CanonicalProduct;
use crate::domain::raw_record::{RawRecord, RawValue};

/// Converts raw records into canonical products
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    normalizer: FieldNormalizer,
}

impl Canonicalizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self::with_normalizer(FieldNormalizer::new()?))
    }

    pub const fn with_normalizer(normalizer: FieldNormalizer) -> Self {
        Self { normalizer }
    }

    pub const fn normalizer(&self) -> &FieldNormalizer {
        &self.normalizer
    }

    /// Canonicalize records in input order, stamping missing scrape times with now
    pub fn canonicalize<'a, I>(&self, records: I) -> Vec<CanonicalProduct>
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        self.canonicalize_at(records, Utc::now())
    }

    /// Same as [`Self::canonicalize`] with an explicit processing time
    pub fn canonicalize_at<'a, I>(&self, records: I, now: DateTime<Utc>) -> Vec<CanonicalProduct>
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        let processed_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut seen = 0usize;

        let products: Vec<CanonicalProduct> = records
            .into_iter()
            .inspect(|_| seen += 1)
            .filter_map(|record| self.canonicalize_record(record, &processed_at))
            .collect();

        info!(
            "Canonicalized {} of {} raw records ({} rejected)",
            products.len(),
            seen,
            seen - products.len()
        );

        products
    }

    /// Canonicalize a single record; `None` when it has no usable title
    pub fn canonicalize_record(
        &self,
        record: &RawRecord,
        processed_at: &str,
    ) -> Option<CanonicalProduct> {
        let title = text_field(record, "title");
        if title.is_empty() {
            debug!("Skipping raw record without title ({} fields)", record.len());
            return None;
        }

        let url = text_field(record, "url");
        let mut id = text_field(record, "id");
        if id.is_empty() && !url.is_empty() {
            if let Some(derived) = self.normalizer.derive_id_from_url(&url) {
                debug!("Derived id {} from url {}", derived, url);
                id = derived;
            }
        }

        let unit_price = normalizer::strip_was_price_suffix(&text_field(record, "unit_price"))
            .to_string();
        let (rate_value, rate_unit) = self.resolve_unit_rate(record, &unit_price);

        let special_text = record
            .text("special_text")
            .and_then(|text| normalizer::normalize_special_text(&text));

        let price_value = self.amount_field(record, "price_value");
        let was_price_value = self.amount_field(record, "was_price_value");
        let save_value = normalizer::derive_save_value(
            self.amount_field(record, "save_value"),
            was_price_value,
            price_value,
        );

        let scraped_at = Some(text_field(record, "scrapedAt"))
            .filter(|value| !value.is_empty())
            .or_else(|| Some(text_field(record, "scraped_at")).filter(|value| !value.is_empty()))
            .unwrap_or_else(|| processed_at.to_string());

        Some(CanonicalProduct {
            id,
            title,
            price_value,
            was_price_value,
            save_value,
            unit_price,
            url,
            image_url: text_field(record, "image_url"),
            category: text_field(record, "category"),
            page: page_field(record),
            vendor: vendor::NAME.to_string(),
            is_on_special: special_text.is_some(),
            special_text: special_text.unwrap_or_default(),
            rate_value,
            rate_unit,
            scraped_at,
        })
    }

    /// Rate from the unit price line, falling back to rate fields the scraper already filled.
    ///
    /// The fallback only applies when both the value and the unit are present.
    fn resolve_unit_rate(
        &self,
        record: &RawRecord,
        unit_price: &str,
    ) -> (Option<f64>, Option<String>) {
        if !unit_price.is_empty() {
            if let Some(rate) = self.normalizer.extract_unit_rate(unit_price) {
                return (Some(rate.value), Some(rate.unit));
            }
        }

        let rate_value = record.number("rate_value").filter(|value| value.is_finite());
        let rate_unit = Some(text_field(record, "rate_unit").to_lowercase())
            .filter(|unit| !unit.is_empty());
        match (rate_value, rate_unit) {
            (Some(value), Some(unit)) => (Some(value), Some(unit)),
            _ => (None, None),
        }
    }

    /// Non-negative amount from a number or a price label
    fn amount_field(&self, record: &RawRecord, key: &str) -> f64 {
        match record.present(key) {
            Some(RawValue::Number(n)) if n.is_finite() && *n >= 0.0 => *n,
            Some(RawValue::Text(text)) => self.normalizer.extract_price(text),
            _ => 0.0,
        }
    }
}

/// Trimmed text of a scalar field, empty when absent
fn text_field(record: &RawRecord, key: &str) -> String {
    record
        .text(key)
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}

fn page_field(record: &RawRecord) -> u32 {
    match record.present("page") {
        Some(RawValue::Number(n)) if n.is_finite() && *n >= 0.0 => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let page = n.min(f64::from(u32::MAX)) as u32;
            page
        }
        Some(RawValue::Text(text)) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
