//! # Category Pipeline
//!
//! Runs canonicalization and deduplication for one category and collects the
//! per-category outcomes of a whole run. Everything here is in-memory and
//! synchronous; file and store I/O happen in the infrastructure layer.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use super::canonicalizer::Canonicalizer;
use super::cross_category::{
    CrossCategoryDuplicates, TitleCollision, find_cross_category_duplicates, find_title_collisions,
};
use super::deduplicator::deduplicate;
use crate::domain::constants::vendor;
use crate::domain::document::{CategoryDocument, CategoryMetadata};
use crate::domain::product::CanonicalProduct;
use crate::domain::raw_record::{RawRecord, RawValue};
use crate::domain::stats::{ProductStats, RunSummary};

/// Raw scraper output for one category
#[derive(Debug, Clone, Default)]
pub struct CategoryInput {
    pub name: String,
    pub url: String,
    pub records: Vec<RawRecord>,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>, url: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            records,
        }
    }
}

/// Result of processing one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryOutcome {
    pub name: String,
    pub url: String,
    /// Number of raw records received, before rejection
    pub raw_count: usize,
    pub unique: Vec<CanonicalProduct>,
    pub duplicates: Vec<CanonicalProduct>,
    pub stats: ProductStats,
    pub metadata: CategoryMetadata,
}

impl CategoryOutcome {
    /// A category counts as scraped when the dump held at least one record
    pub const fn is_successful(&self) -> bool {
        self.raw_count > 0
    }

    pub fn document(&self) -> CategoryDocument {
        CategoryDocument {
            metadata: self.metadata.clone(),
            products: self.unique.clone(),
        }
    }
}

/// Canonicalize → deduplicate for a single category
#[derive(Debug, Clone)]
pub struct CategoryPipeline {
    canonicalizer: Canonicalizer,
}

impl CategoryPipeline {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self::with_canonicalizer(Canonicalizer::new()?))
    }

    pub const fn with_canonicalizer(canonicalizer: Canonicalizer) -> Self {
        Self { canonicalizer }
    }

    pub fn process(&self, input: CategoryInput, now: DateTime<Utc>) -> CategoryOutcome {
        let CategoryInput { name, url, records } = input;
        if records.is_empty() {
            warn!("⚠️ No raw records for category {}", name);
        }

        let canonical = self.canonicalizer.canonicalize_at(&records, now);
        let dedup = deduplicate(canonical);

        let pages_scraped = dedup
            .unique
            .iter()
            .map(|product| product.page)
            .max()
            .unwrap_or(0);

        let metadata = CategoryMetadata {
            category: name.clone(),
            url: url.clone(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            expected_products: expected_count(records.first()),
            actual_products: dedup.unique.len(),
            duplicates_removed: dedup.stats.duplicates_removed,
            pages_scraped,
            vendor: vendor::NAME.to_string(),
        };

        info!(
            "📦 {}: {} unique products from {} raw records ({} duplicates)",
            name,
            dedup.unique.len(),
            records.len(),
            dedup.stats.duplicates_removed
        );

        CategoryOutcome {
            name,
            url,
            raw_count: records.len(),
            unique: dedup.unique,
            duplicates: dedup.duplicates,
            stats: dedup.stats,
            metadata,
        }
    }
}

/// Retailer-reported product count carried on the first scraped record
fn expected_count(first: Option<&RawRecord>) -> usize {
    let Some(record) = first else {
        return 0;
    };
    match record.present("expected_count") {
        Some(RawValue::Number(n)) if n.is_finite() && *n >= 0.0 => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let count = *n as usize;
            count
        }
        Some(RawValue::Text(text)) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Outcomes of one run, in processing order
#[derive(Debug, Clone)]
pub struct CatalogRun {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    outcomes: Vec<CategoryOutcome>,
}

impl CatalogRun {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4(), started_at)
    }

    pub const fn with_id(run_id: Uuid, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            started_at,
            outcomes: Vec::new(),
        }
    }

    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn record(&mut self, outcome: CategoryOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[CategoryOutcome] {
        &self.outcomes
    }

    pub fn successful(&self) -> impl Iterator<Item = &CategoryOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_successful())
    }

    /// Unique products per successful category
    pub fn by_category(&self) -> Vec<(&str, &[CanonicalProduct])> {
        self.successful()
            .map(|outcome| (outcome.name.as_str(), outcome.unique.as_slice()))
            .collect()
    }

    pub fn cross_category(&self) -> CrossCategoryDuplicates {
        find_cross_category_duplicates(self.by_category())
    }

    pub fn title_collisions(&self) -> Vec<TitleCollision> {
        find_title_collisions(self.by_category())
    }

    pub fn category_metadata(&self) -> Vec<CategoryMetadata> {
        self.successful()
            .map(|outcome| outcome.metadata.clone())
            .collect()
    }

    pub fn summary(&self) -> RunSummary {
        self.summary_with(&self.cross_category())
    }

    /// Summary reusing an already computed cross-category result
    pub fn summary_with(&self, cross: &CrossCategoryDuplicates) -> RunSummary {
        let successful: Vec<&CategoryOutcome> = self.successful().collect();

        RunSummary {
            run_id: self.run_id,
            run_timestamp: self.started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            categories_attempted: self.outcomes.len(),
            categories_successful: successful.len(),
            total_products: successful.iter().map(|outcome| outcome.unique.len()).sum(),
            cross_category_duplicates: cross.len(),
            results_by_category: successful
                .iter()
                .map(|outcome| (outcome.name.clone(), outcome.unique.len()))
                .collect(),
            pages_by_category: successful
                .iter()
                .map(|outcome| (outcome.name.clone(), outcome.metadata.pages_scraped))
                .collect(),
            vendor: vendor::NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).single().expect("valid date")
    }

    fn pipeline() -> CategoryPipeline {
        CategoryPipeline::new().expect("patterns compile")
    }

    fn raw(id: &str, title: &str, page: i64) -> RawRecord {
        RawRecord::new()
            .with("id", id)
            .with("title", title)
            .with("price_value", 2.5)
            .with("page", page)
    }

    #[test]
    fn metadata_reflects_dedup_result() {
        let records = vec![
            raw("1", "Bread", 1).with("expected_count", 10_i64),
            raw("1", "Bread", 2),
            raw("2", "Rolls", 3),
            RawRecord::new().with("id", "3"),
        ];
        let outcome = pipeline().process(CategoryInput::new("bakery", "https://b", records), now());

        assert!(outcome.is_successful());
        assert_eq!(outcome.raw_count, 4);
        assert_eq!(outcome.stats, ProductStats::new(3, 2));
        assert_eq!(outcome.metadata.expected_products, 10);
        assert_eq!(outcome.metadata.actual_products, 2);
        assert_eq!(outcome.metadata.duplicates_removed, 1);
        assert_eq!(outcome.metadata.pages_scraped, 3);
        assert_eq!(outcome.metadata.timestamp, "2025-03-01T09:30:00.000Z");
        assert_eq!(outcome.metadata.vendor, "coles");
        assert_eq!(outcome.document().products.len(), 2);
    }

    #[test]
    fn empty_dump_is_not_successful() {
        let outcome = pipeline().process(CategoryInput::new("pet", "https://p", Vec::new()), now());
        assert!(!outcome.is_successful());
        assert_eq!(outcome.metadata.pages_scraped, 0);
        assert_eq!(outcome.metadata.expected_products, 0);
    }

    #[test]
    fn all_rejected_is_still_successful_but_empty() {
        let records = vec![RawRecord::new().with("id", "1"), RawRecord::new().with("title", "")];
        let outcome = pipeline().process(CategoryInput::new("deli", "https://d", records), now());
        assert!(outcome.is_successful());
        assert!(outcome.unique.is_empty());
        assert_eq!(outcome.stats.duplicates_removed, 0);
    }

    #[test]
    fn expected_count_accepts_text() {
        let record = RawRecord::new().with("expected_count", " 42 ");
        assert_eq!(expected_count(Some(&record)), 42);
        assert_eq!(expected_count(Some(&RawRecord::new().with("expected_count", -1.0))), 0);
        assert_eq!(expected_count(None), 0);
    }

    #[test]
    fn run_summary_counts_only_successful_categories() {
        let pipeline = pipeline();
        let mut run = CatalogRun::with_id(Uuid::nil(), now());

        run.record(pipeline.process(
            CategoryInput::new("bakery", "u1", vec![raw("999", "Butter", 1), raw("1", "Bread", 2)]),
            now(),
        ));
        run.record(pipeline.process(CategoryInput::new("pet", "u2", Vec::new()), now()));
        run.record(pipeline.process(
            CategoryInput::new("dairy", "u3", vec![raw("999", "Butter", 1)]),
            now(),
        ));

        let summary = run.summary();
        assert_eq!(summary.run_id, Uuid::nil());
        assert_eq!(summary.categories_attempted, 3);
        assert_eq!(summary.categories_successful, 2);
        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.cross_category_duplicates, 1);
        assert_eq!(summary.results_by_category.get("bakery"), Some(&2));
        assert!(!summary.results_by_category.contains_key("pet"));
        assert_eq!(summary.pages_by_category.get("bakery"), Some(&2));
        assert_eq!(run.category_metadata().len(), 2);
    }
}
