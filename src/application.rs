//! Application layer module
//!
//! This module contains the catalog pipeline stages (normalize,
//! canonicalize, deduplicate, cross-category analysis), report rendering
//! and the upload service that orchestrate the domain types.

pub mod canonicalizer;
pub mod cross_category;
pub mod deduplicator;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod upload_service;

pub use canonicalizer::Canonicalizer;
pub use cross_category::{
    CrossCategoryDuplicates, CrossCategoryGroup, TitleCollision, find_cross_category_duplicates,
    find_title_collisions,
};
pub use deduplicator::{DedupOutcome, deduplicate};
pub use normalizer::{FieldNormalizer, UnitRate};
pub use pipeline::{CatalogRun, CategoryInput, CategoryOutcome, CategoryPipeline};
pub use upload_service::{CatalogUploader, UploadReport};
