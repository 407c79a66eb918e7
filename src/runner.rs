//! Catalog run orchestration
//!
//! Loads each selected category's dump, runs the pipeline, writes the output
//! files and optionally uploads to the catalog store. Dump and store failures
//! are logged and the run continues; output write failures end the run.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, SecondsFormat, Utc};
use tracing::{error, info, warn};

use crate::application::pipeline::{CatalogRun, CategoryInput, CategoryOutcome, CategoryPipeline};
use crate::application::report;
use crate::application::upload_service::CatalogUploader;
use crate::domain::category::{CategoryTarget, select_categories};
use crate::domain::services::CatalogStore;
use crate::domain::stats::RunSummary;
use crate::infrastructure::catalog_store_impls::JsonFileCatalogStore;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::output_writer::OutputWriter;
use crate::infrastructure::raw_dump_loader::RawDumpLoader;

/// Result of a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: RunSummary,
    /// Every file written, in write order
    pub written: Vec<PathBuf>,
}

pub struct CatalogRunner {
    config: AppConfig,
    pipeline: CategoryPipeline,
    loader: RawDumpLoader,
    store: Option<Arc<dyn CatalogStore>>,
}

impl CatalogRunner {
    pub fn new(config: AppConfig) -> Result<Self> {
        let pipeline = CategoryPipeline::new().context("Failed to compile field patterns")?;
        let loader = RawDumpLoader::new(&config.input.dump_dir);
        Ok(Self {
            config,
            pipeline,
            loader,
            store: None,
        })
    }

    /// Upload to the given store regardless of `upload.enabled`
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn CatalogStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// File store from `upload.store_path` when uploads are enabled
    async fn resolve_uploader(&self) -> Option<CatalogUploader> {
        let batch_size = self.config.upload.batch_size;
        if let Some(store) = &self.store {
            return Some(CatalogUploader::new(Arc::clone(store), batch_size));
        }
        if !self.config.upload.enabled {
            return None;
        }

        match JsonFileCatalogStore::open(&self.config.upload.store_path).await {
            Ok(store) => Some(CatalogUploader::new(Arc::new(store), batch_size)),
            Err(e) => {
                error!("❌ Catalog store unavailable, skipping uploads: {:#}", e);
                None
            }
        }
    }

    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();
        let started_local = Local::now().naive_local();
        let writer = OutputWriter::new(&self.config.output.output_dir, &started_local);
        writer.ensure_output_dir().await.with_context(|| {
            format!("Failed to create output directory {:?}", writer.output_dir())
        })?;

        let targets = select_categories(
            &self.config.categories,
            self.config.category_filter.as_deref(),
        );
        let uploader = self.resolve_uploader().await;
        let mut run = CatalogRun::new(started_at);
        let mut written = Vec::new();

        info!("🚀 Starting catalog run {} ({} categories)", run.run_id(), targets.len());

        for target in targets {
            let outcome = self.process_target(target).await;

            if outcome.is_successful() {
                written.extend(self.write_category_outputs(&writer, &outcome).await?);

                if let Some(uploader) = &uploader {
                    let updated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
                    let upload = uploader.upload_category(&outcome, &updated_at).await;
                    if !upload.is_complete() {
                        warn!("⚠️ Upload for {} was incomplete: {:?}", outcome.name, upload);
                    }
                }
            }

            run.record(outcome);
        }

        let cross = run.cross_category();
        let summary = run.summary_with(&cross);
        let completed_local = Local::now().naive_local();

        if self.config.output.write_reports {
            let collisions = run.title_collisions();
            let cross_report =
                report::render_cross_category_report(&cross, &collisions, &completed_local);
            written.push(writer.write_cross_category_report(&cross_report).await?);

            let summary_text = report::render_run_summary(
                &summary,
                &run.category_metadata(),
                &started_local,
                &completed_local,
            );
            written.push(writer.write_summary(&summary_text).await?);
        }

        written.push(writer.write_run_summary(&summary).await?);

        if let Some(uploader) = &uploader {
            uploader.record_run(&summary).await;
        }

        info!(
            "✅ Run {} done: {}/{} categories ({:.1}%), {} products, {} cross-category",
            summary.run_id,
            summary.categories_successful,
            summary.categories_attempted,
            summary.success_rate() * 100.0,
            summary.total_products,
            summary.cross_category_duplicates
        );

        Ok(RunReport { summary, written })
    }

    async fn process_target(&self, target: &CategoryTarget) -> CategoryOutcome {
        info!("📂 Processing category {}", target.name);

        let (records, dump_url) = match self.loader.load_category(&target.name).await {
            Ok(Some(dump)) => (dump.records, dump.url),
            Ok(None) => (Vec::new(), None),
            Err(e) => {
                error!("❌ Failed to load dump for {}: {:#}", target.name, e);
                (Vec::new(), None)
            }
        };

        let url = if target.url.is_empty() {
            dump_url.unwrap_or_default()
        } else {
            target.url.clone()
        };

        self.pipeline
            .process(CategoryInput::new(&target.name, url, records), Utc::now())
    }

    async fn write_category_outputs(
        &self,
        writer: &OutputWriter,
        outcome: &CategoryOutcome,
    ) -> Result<Vec<PathBuf>> {
        let mut written = vec![writer.write_category_document(&outcome.document()).await?];

        if self.config.output.write_reports {
            let text = report::render_duplicate_report(
                &outcome.duplicates,
                &outcome.name,
                &outcome.stats,
                &Local::now().naive_local(),
            );
            written.push(writer.write_duplicate_report(&outcome.name, &text).await?);
        }

        Ok(written)
    }
}
