//! 카탈로그 저장소 서비스 트레이트 정의
//!
//! 중복 제거가 끝난 제품과 통계를 외부 저장소에 반영하는
//! 업로드 협력자의 인터페이스를 정의합니다.

use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::product::CanonicalProduct;
use crate::domain::stats::{CategoryStatsRecord, RunSummary};

/// 카탈로그 저장소
///
/// 제품은 `id` 기준 upsert 이므로 같은 배치를 두 번 보내도 결과가 같아야 합니다.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// 이미 저장된 제품 ID 조회 (카테고리 필터 선택)
    async fn existing_product_ids(&self, category: Option<&str>) -> Result<HashSet<String>>;

    /// 제품 배치 upsert, 반영된 건수 반환
    async fn upsert_products(&self, batch: &[CanonicalProduct]) -> Result<usize>;

    /// 카테고리 통계 upsert (category 기준)
    async fn upsert_category_stats(&self, record: &CategoryStatsRecord) -> Result<()>;

    /// 실행 요약 기록 (append)
    async fn record_run(&self, summary: &RunSummary) -> Result<()>;
}

// === 데이터 구조체들 ===

/// 저장소 전체 상태
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub products: BTreeMap<String, CanonicalProduct>,
    pub category_stats: BTreeMap<String, CategoryStatsRecord>,
    pub runs: Vec<RunSummary>,
}
