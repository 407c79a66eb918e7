use serde::{Deserialize, Serialize};

use super::constants::vendor;

/// Product normalized into the fixed output schema
///
/// Every field is always present except the unit rate, which only exists
/// when a `$<n> per <unit>` pattern could be read from `unit_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProduct {
    /// Retailer product id; empty when neither the scraper nor the URL gave one
    pub id: String,
    pub title: String,
    pub price_value: f64,
    pub was_price_value: f64,
    pub save_value: f64,
    pub unit_price: String,
    pub url: String,
    pub image_url: String,
    pub category: String,
    pub page: u32,
    pub vendor: String,
    pub is_on_special: bool,
    pub special_text: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rate_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rate_unit: Option<String>,
    #[serde(rename = "scrapedAt")]
    pub scraped_at: String,
}

impl CanonicalProduct {
    /// Empty product carrying only a title; every other field at its default
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            price_value: 0.0,
            was_price_value: 0.0,
            save_value: 0.0,
            unit_price: String::new(),
            url: String::new(),
            image_url: String::new(),
            category: String::new(),
            page: 0,
            vendor: vendor::NAME.to_string(),
            is_on_special: false,
            special_text: String::new(),
            rate_value: None,
            rate_unit: None,
            scraped_at: String::new(),
        }
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Identity used for duplicate detection
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::for_product(self)
    }
}

/// Identity of a product for duplicate detection
///
/// Real ids and pseudo-keys live in separate namespaces, so an id that happens
/// to look like `"<title>-<price>"` never collides with a pseudo-key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DedupKey {
    Id(String),
    /// `title` and `price_value` joined by `-` for products without an id
    Pseudo(String),
}

impl DedupKey {
    pub fn for_product(product: &CanonicalProduct) -> Self {
        if product.has_id() {
            Self::Id(product.id.clone())
        } else {
            Self::Pseudo(format!("{}-{:?}", product.title, product.price_value))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Id(key) | Self::Pseudo(key) => key,
        }
    }
}

impl std::fmt::Display for DedupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
