//! Per-category JSON output document

use serde::{Deserialize, Serialize};

use super::product::CanonicalProduct;
use super::stats::CategoryStatsRecord;

/// Metadata block written ahead of a category's products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMetadata {
    pub category: String,
    pub url: String,
    pub timestamp: String,
    pub expected_products: usize,
    pub actual_products: usize,
    pub duplicates_removed: usize,
    pub pages_scraped: u32,
    pub vendor: String,
}

impl CategoryMetadata {
    /// Share of the retailer-reported product count that was captured, in percent
    pub fn coverage_percent(&self) -> Option<f64> {
        (self.expected_products > 0)
            .then(|| self.actual_products as f64 / self.expected_products as f64 * 100.0)
    }

    /// Stats record for the upload collaborator
    pub fn to_stats_record(&self, updated_at: impl Into<String>) -> CategoryStatsRecord {
        CategoryStatsRecord {
            category: self.category.clone(),
            expected_products: self.expected_products,
            actual_products: self.actual_products,
            duplicates_removed: self.duplicates_removed,
            pages_scraped: self.pages_scraped,
            updated_at: updated_at.into(),
        }
    }
}

/// `{ metadata, products }` document for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDocument {
    pub metadata: CategoryMetadata,
    pub products: Vec<CanonicalProduct>,
}
