//! 카탈로그 업로드 서비스
//!
//! 카테고리 처리 결과를 [`CatalogStore`]에 배치 단위로 반영합니다.
//! 저장소 오류는 기록만 하고 실행을 중단하지 않습니다.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::pipeline::CategoryOutcome;
use crate::domain::constants::upload::DEFAULT_BATCH_SIZE;
use crate::domain::product::CanonicalProduct;
use crate::domain::services::CatalogStore;
use crate::domain::stats::RunSummary;

/// 카테고리 업로드 결과
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub new_products: usize,
    pub updated_products: usize,
    pub upserted: usize,
    pub failed_batches: usize,
    pub stats_recorded: bool,
}

impl UploadReport {
    pub const fn is_complete(&self) -> bool {
        self.failed_batches == 0 && self.stats_recorded
    }
}

/// 저장소 업로드 협력자
#[derive(Clone)]
pub struct CatalogUploader {
    store: Arc<dyn CatalogStore>,
    batch_size: usize,
}

impl CatalogUploader {
    pub fn new(store: Arc<dyn CatalogStore>, batch_size: usize) -> Self {
        let batch_size = if batch_size == 0 {
            warn!("Upload batch size 0 is invalid, using {}", DEFAULT_BATCH_SIZE);
            DEFAULT_BATCH_SIZE
        } else {
            batch_size
        };
        Self { store, batch_size }
    }

    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 카테고리의 고유 제품과 통계를 업로드
    pub async fn upload_category(
        &self,
        outcome: &CategoryOutcome,
        updated_at: &str,
    ) -> UploadReport {
        let category = outcome.name.as_str();
        let mut report = UploadReport::default();

        let existing = match self.store.existing_product_ids(Some(category)).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!("⚠️ Could not read existing products for {}: {:#}", category, e);
                HashSet::new()
            }
        };

        let (updated, new): (Vec<CanonicalProduct>, Vec<CanonicalProduct>) = outcome
            .unique
            .iter()
            .map(|product| prepare_for_store(product, category))
            .partition(|product| existing.contains(&product.id));

        report.new_products = new.len();
        report.updated_products = updated.len();
        info!(
            "📤 Uploading {}: {} new, {} existing products",
            category, report.new_products, report.updated_products
        );

        for products in [&new, &updated] {
            for (index, batch) in products.chunks(self.batch_size).enumerate() {
                match self.store.upsert_products(batch).await {
                    Ok(count) => {
                        debug!("Batch {} for {} upserted {} products", index + 1, category, count);
                        report.upserted += count;
                    }
                    Err(e) => {
                        error!(
                            "❌ Failed to upsert batch {} for {}: {:#}",
                            index + 1,
                            category,
                            e
                        );
                        report.failed_batches += 1;
                    }
                }
            }
        }

        let stats = outcome.metadata.to_stats_record(updated_at);
        match self.store.upsert_category_stats(&stats).await {
            Ok(()) => report.stats_recorded = true,
            Err(e) => error!("❌ Failed to upsert category stats for {}: {:#}", category, e),
        }

        report
    }

    /// 실행 요약 기록, 실패 시 false
    pub async fn record_run(&self, summary: &RunSummary) -> bool {
        match self.store.record_run(summary).await {
            Ok(()) => {
                info!("✅ Recorded run {}", summary.run_id);
                true
            }
            Err(e) => {
                error!("❌ Failed to record run {}: {:#}", summary.run_id, e);
                false
            }
        }
    }
}

/// 저장용 제품: 카테고리를 채우고, ID가 없으면 의사 키를 ID로 사용
fn prepare_for_store(product: &CanonicalProduct, category: &str) -> CanonicalProduct {
    let mut stored = product.clone();
    if !stored.has_id() {
        stored.id = stored.dedup_key().as_str().to_string();
    }
    stored.category = category.to_string();
    stored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_without_id_is_stored_under_pseudo_key() {
        let mut product = CanonicalProduct::titled("Milk 2L");
        product.price_value = 3.5;
        product.category = "scraped".to_string();

        let stored = prepare_for_store(&product, "dairy");
        assert_eq!(stored.id, "Milk 2L-3.5");
        assert_eq!(stored.category, "dairy");

        product.id = "77".to_string();
        assert_eq!(prepare_for_store(&product, "dairy").id, "77");
    }
}
