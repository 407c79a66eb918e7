//! Infrastructure layer for configuration, logging, file I/O and storage
//!
//! This module provides configuration loading, logging setup, raw dump
//! loading, output writing and the catalog store implementations.

pub mod catalog_error;
pub mod catalog_store_impls;
pub mod config;
pub mod logging;
pub mod output_writer;
pub mod raw_dump_loader;

// Re-export commonly used items
pub use catalog_error::{CatalogError, CatalogResult};
pub use catalog_store_impls::{InMemoryCatalogStore, JsonFileCatalogStore};
pub use config::{AppConfig, ConfigError, ConfigManager, LoggingConfig};
pub use logging::{get_log_directory, init_logging, init_logging_with_config, log_system_info};
pub use output_writer::OutputWriter;
pub use raw_dump_loader::{RawDump, RawDumpLoader};
