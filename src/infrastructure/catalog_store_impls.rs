//! 카탈로그 저장소 구현체들
//!
//! 메모리 저장소와, 같은 상태를 JSON 파일로 유지하는 파일 저장소를 제공합니다.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::catalog_error::CatalogError;
use crate::domain::product::CanonicalProduct;
use crate::domain::services::{CatalogStore, StoreSnapshot};
use crate::domain::stats::{CategoryStatsRecord, RunSummary};

/// 메모리 저장소
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    state: RwLock<StoreSnapshot>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.clone()
    }

    pub async fn product_count(&self) -> usize {
        self.state.read().await.products.len()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn existing_product_ids(&self, category: Option<&str>) -> Result<HashSet<String>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .values()
            .filter(|product| category.is_none_or(|c| product.category == c))
            .map(|product| product.id.clone())
            .collect())
    }

    async fn upsert_products(&self, batch: &[CanonicalProduct]) -> Result<usize> {
        // 배치 전체를 검증한 뒤에만 반영
        if batch.iter().any(|product| product.id.is_empty()) {
            return Err(CatalogError::store("product id must not be empty").into());
        }

        let mut state = self.state.write().await;
        for product in batch {
            state.products.insert(product.id.clone(), product.clone());
        }
        debug!("Upserted {} products", batch.len());
        Ok(batch.len())
    }

    async fn upsert_category_stats(&self, record: &CategoryStatsRecord) -> Result<()> {
        self.state
            .write()
            .await
            .category_stats
            .insert(record.category.clone(), record.clone());
        Ok(())
    }

    async fn record_run(&self, summary: &RunSummary) -> Result<()> {
        self.state.write().await.runs.push(summary.clone());
        Ok(())
    }
}

/// JSON 파일 저장소
///
/// 변경이 있을 때마다 전체 상태를 파일에 다시 씁니다.
#[derive(Debug)]
pub struct JsonFileCatalogStore {
    path: PathBuf,
    inner: InMemoryCatalogStore,
}

impl JsonFileCatalogStore {
    /// 파일이 있으면 읽어오고, 없으면 빈 저장소로 시작
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshot = match fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str::<StoreSnapshot>(&content)
                .map_err(|e| CatalogError::json(&path, e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Catalog store {:?} not found, starting empty", path);
                StoreSnapshot::default()
            }
            Err(e) => return Err(CatalogError::io(&path, e).into()),
        };

        info!(
            "🗄️ Opened catalog store {:?} ({} products)",
            path,
            snapshot.products.len()
        );
        Ok(Self {
            path,
            inner: InMemoryCatalogStore::from_snapshot(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.inner.snapshot().await
    }

    async fn persist(&self) -> Result<()> {
        let snapshot = self.inner.snapshot().await;
        let content = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| CatalogError::json(&self.path, e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create store directory {parent:?}"))?;
        }
        fs::write(&self.path, content)
            .await
            .map_err(|e| CatalogError::io(&self.path, e))?;
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for JsonFileCatalogStore {
    async fn existing_product_ids(&self, category: Option<&str>) -> Result<HashSet<String>> {
        self.inner.existing_product_ids(category).await
    }

    async fn upsert_products(&self, batch: &[CanonicalProduct]) -> Result<usize> {
        let count = self.inner.upsert_products(batch).await?;
        self.persist().await?;
        Ok(count)
    }

    async fn upsert_category_stats(&self, record: &CategoryStatsRecord) -> Result<()> {
        self.inner.upsert_category_stats(record).await?;
        self.persist().await
    }

    async fn record_run(&self, summary: &RunSummary) -> Result<()> {
        self.inner.record_run(summary).await?;
        self.persist().await
    }
}
