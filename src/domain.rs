//! Domain module - Core catalog entities
//!
//! This module contains the record types that flow through the catalog
//! pipeline, the statistics produced along the way, and the service
//! traits implemented by the infrastructure layer.
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod category;
pub mod constants;
pub mod document;
pub mod product;
pub mod raw_record;
pub mod services;
pub mod stats;

// Re-export commonly used items for convenience
pub use category::{CategoryTarget, select_categories};
pub use document::{CategoryDocument, CategoryMetadata};
pub use product::{CanonicalProduct, DedupKey};
pub use raw_record::{RawRecord, RawValue};
pub use stats::{CategoryStatsRecord, ProductStats, RunSummary};
