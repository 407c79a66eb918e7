//! Output file writer
//!
//! Every file of one run shares the same `YYYYmmdd_HHMMSS` stamp.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use tokio::fs;
use tracing::info;

use super::catalog_error::{CatalogError, CatalogResult};
use crate::domain::constants::{report::RUN_STAMP_FORMAT, vendor};
use crate::domain::document::CategoryDocument;
use crate::domain::stats::RunSummary;

#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_dir: PathBuf,
    run_stamp: String,
}

impl OutputWriter {
    pub fn new(output_dir: impl Into<PathBuf>, started_at: &NaiveDateTime) -> Self {
        Self {
            output_dir: output_dir.into(),
            run_stamp: started_at.format(RUN_STAMP_FORMAT).to_string(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn run_stamp(&self) -> &str {
        &self.run_stamp
    }

    pub async fn ensure_output_dir(&self) -> CatalogResult<()> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| CatalogError::io(&self.output_dir, e))
    }

    pub fn category_document_path(&self, category: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}_{}.json", vendor::FILE_PREFIX, category, self.run_stamp))
    }

    pub fn duplicate_report_path(&self, category: &str) -> PathBuf {
        self.output_dir
            .join(format!("duplicates_{}_{}.txt", category, self.run_stamp))
    }

    pub fn cross_category_report_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("cross_category_duplicates_{}.txt", self.run_stamp))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(format!("summary_{}.txt", self.run_stamp))
    }

    pub fn run_summary_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_run_summary_{}.json", vendor::FILE_PREFIX, self.run_stamp))
    }

    pub async fn write_category_document(
        &self,
        document: &CategoryDocument,
    ) -> CatalogResult<PathBuf> {
        let path = self.category_document_path(&document.metadata.category);
        write_json(&path, document).await?;
        info!(
            "💾 Saved {} products to {:?}",
            document.products.len(),
            path
        );
        Ok(path)
    }

    pub async fn write_duplicate_report(
        &self,
        category: &str,
        report: &str,
    ) -> CatalogResult<PathBuf> {
        let path = self.duplicate_report_path(category);
        write_text(&path, report).await?;
        Ok(path)
    }

    pub async fn write_cross_category_report(&self, report: &str) -> CatalogResult<PathBuf> {
        let path = self.cross_category_report_path();
        write_text(&path, report).await?;
        Ok(path)
    }

    pub async fn write_summary(&self, summary: &str) -> CatalogResult<PathBuf> {
        let path = self.summary_path();
        write_text(&path, summary).await?;
        Ok(path)
    }

    pub async fn write_run_summary(&self, summary: &RunSummary) -> CatalogResult<PathBuf> {
        let path = self.run_summary_path();
        write_json(&path, summary).await?;
        info!("💾 Run summary saved to {:?}", path);
        Ok(path)
    }
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> CatalogResult<()> {
    let content = serde_json::to_string_pretty(value).map_err(|e| CatalogError::json(path, e))?;
    write_text(path, &content).await
}

async fn write_text(path: &Path, content: &str) -> CatalogResult<()> {
    fs::write(path, content)
        .await
        .map_err(|e| CatalogError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::CategoryMetadata;
    use chrono::NaiveDate;

    fn started_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .and_then(|date| date.and_hms_opt(9, 5, 7))
            .expect("valid timestamp")
    }

    #[test]
    fn file_names_share_the_run_stamp() {
        let writer = OutputWriter::new("out", &started_at());
        assert_eq!(writer.run_stamp(), "20250301_090507");
        assert_eq!(
            writer.category_document_path("bakery"),
            PathBuf::from("out/coles_bakery_20250301_090507.json")
        );
        assert_eq!(
            writer.duplicate_report_path("bakery"),
            PathBuf::from("out/duplicates_bakery_20250301_090507.txt")
        );
        assert_eq!(
            writer.cross_category_report_path(),
            PathBuf::from("out/cross_category_duplicates_20250301_090507.txt")
        );
        assert_eq!(writer.summary_path(), PathBuf::from("out/summary_20250301_090507.txt"));
        assert_eq!(
            writer.run_summary_path(),
            PathBuf::from("out/coles_run_summary_20250301_090507.json")
        );
    }

    #[tokio::test]
    async fn category_document_is_pretty_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let writer = OutputWriter::new(dir.path().join("nested"), &started_at());
        writer.ensure_output_dir().await.expect("mkdir");

        let document = CategoryDocument {
            metadata: CategoryMetadata {
                category: "bakery".to_string(),
                url: "https://www.coles.com.au/browse/bakery".to_string(),
                timestamp: "2025-03-01T09:05:07.000Z".to_string(),
                expected_products: 0,
                actual_products: 0,
                duplicates_removed: 0,
                pages_scraped: 0,
                vendor: "coles".to_string(),
            },
            products: Vec::new(),
        };

        let path = writer.write_category_document(&document).await.expect("written");
        let content = std::fs::read_to_string(&path).expect("readable");
        assert!(content.contains("\n  \"metadata\""));

        let parsed: CategoryDocument = serde_json::from_str(&content).expect("round trip");
        assert_eq!(parsed, document);
    }
}
