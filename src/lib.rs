//! Grocery Catalog - normalization and deduplication of scraped product listings
//!
//! Raw product records scraped from supermarket category pages are
//! canonicalized into a fixed schema, deduplicated per category, checked for
//! products listed under several categories, and written out as JSON
//! documents and plain-text reports.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod runner;

pub use runner::{CatalogRunner, RunReport};
