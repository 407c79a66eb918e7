//! 카탈로그 처리 통계 구조체들
//!
//! 카테고리 단위 중복 제거 통계와 실행 단위 요약을 정의합니다.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 한 번의 중복 제거 실행 결과 통계
///
/// 호출마다 새로 계산되며 누적되지 않습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductStats {
    pub total_before: usize,
    pub total_after: usize,
    pub duplicates_removed: usize,
}

impl ProductStats {
    pub const fn new(total_before: usize, total_after: usize) -> Self {
        Self {
            total_before,
            total_after,
            duplicates_removed: total_before.saturating_sub(total_after),
        }
    }
}

/// 업로드용 카테고리 통계 레코드 (category 기준 upsert)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStatsRecord {
    pub category: String,
    pub expected_products: usize,
    pub actual_products: usize,
    pub duplicates_removed: usize,
    pub pages_scraped: u32,
    pub updated_at: String,
}

/// 실행 단위 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub run_timestamp: String,
    pub categories_attempted: usize,
    pub categories_successful: usize,
    pub total_products: usize,
    pub cross_category_duplicates: usize,
    pub results_by_category: BTreeMap<String, usize>,
    pub pages_by_category: BTreeMap<String, u32>,
    pub vendor: String,
}

impl RunSummary {
    /// 성공률 (0.0 ~ 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.categories_attempted == 0 {
            0.0
        } else {
            self.categories_successful as f64 / self.categories_attempted as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_removed_is_the_difference() {
        let stats = ProductStats::new(10, 7);
        assert_eq!(stats.duplicates_removed, 3);
        assert_eq!(ProductStats::new(0, 0), ProductStats::default());
    }

    #[test]
    fn success_rate_handles_empty_runs() {
        let mut summary = RunSummary {
            run_id: Uuid::nil(),
            run_timestamp: String::new(),
            categories_attempted: 0,
            categories_successful: 0,
            total_products: 0,
            cross_category_duplicates: 0,
            results_by_category: BTreeMap::new(),
            pages_by_category: BTreeMap::new(),
            vendor: "coles".to_string(),
        };
        assert_eq!(summary.success_rate(), 0.0);

        summary.categories_attempted = 4;
        summary.categories_successful = 3;
        assert!((summary.success_rate() - 0.75).abs() < f64::EPSILON);
    }
}
