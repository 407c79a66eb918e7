#![allow(missing_docs)]

use anyhow::{Context, Result};
use grocery_catalog_lib::CatalogRunner;
use grocery_catalog_lib::infrastructure::{ConfigManager, init_logging_with_config, log_system_info};

#[tokio::main]
async fn main() -> Result<()> {
    let manager = match std::env::args().nth(1) {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };

    let config = manager
        .load_config()
        .context("Failed to load configuration")?;

    init_logging_with_config(&config.logging).context("Failed to initialize logging")?;
    log_system_info();

    let report = CatalogRunner::new(config)?.run().await?;

    println!(
        "Processed {}/{} categories, {} products ({} cross-category duplicates)",
        report.summary.categories_successful,
        report.summary.categories_attempted,
        report.summary.total_products,
        report.summary.cross_category_duplicates
    );

    Ok(())
}
