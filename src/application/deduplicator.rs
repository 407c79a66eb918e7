//! 카테고리 내 중복 제거
//!
//! 한 카테고리의 정규화된 제품 목록을 왼쪽에서 오른쪽으로 한 번 훑으며
//! 먼저 나온 제품을 남기고 같은 키의 뒤 제품을 중복으로 분류합니다.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::domain::product::{CanonicalProduct, DedupKey};
use crate::domain::stats::ProductStats;

/// 중복 제거 결과
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupOutcome {
    pub unique: Vec<CanonicalProduct>,
    pub duplicates: Vec<CanonicalProduct>,
    pub stats: ProductStats,
}

impl DedupOutcome {
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty()
    }

    /// 중복 비율 (0.0 ~ 1.0)
    pub fn duplicate_rate(&self) -> f64 {
        if self.stats.total_before == 0 {
            0.0
        } else {
            self.stats.duplicates_removed as f64 / self.stats.total_before as f64
        }
    }
}

/// 첫 등장 우선 중복 제거
///
/// 키가 같으면 필드가 달라도 뒤에 나온 제품은 항상 중복입니다 (병합 없음).
pub fn deduplicate(products: impl IntoIterator<Item = CanonicalProduct>) -> DedupOutcome {
    let mut seen: HashSet<DedupKey> = HashSet::new();
    let mut unique = Vec::new();
    let mut duplicates = Vec::new();

    for product in products {
        let key = product.dedup_key();
        if seen.contains(&key) {
            debug!("Duplicate product {} ({})", key, product.title);
            duplicates.push(product);
        } else {
            seen.insert(key);
            unique.push(product);
        }
    }

    let stats = ProductStats::new(unique.len() + duplicates.len(), unique.len());
    info!("Removed {} duplicate products", stats.duplicates_removed);

    DedupOutcome {
        unique,
        duplicates,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, title: &str, price: f64) -> CanonicalProduct {
        let mut product = CanonicalProduct::titled(title);
        product.id = id.to_string();
        product.price_value = price;
        product
    }

    #[test]
    fn first_occurrence_wins() {
        let outcome = deduplicate(vec![
            product("123", "Milk 2L", 3.5),
            product("123", "Milk 2 Litre", 3.6),
        ]);

        assert_eq!(outcome.unique.len(), 1);
        assert_eq!(outcome.unique[0].title, "Milk 2L");
        assert_eq!(outcome.duplicates.len(), 1);
        assert_eq!(outcome.duplicates[0].title, "Milk 2 Litre");
    }

    #[test]
    fn pseudo_key_fallback() {
        let same_price =
            deduplicate(vec![product("", "Milk 2L", 3.5), product("", "Milk 2L", 3.5)]);
        assert_eq!(same_price.unique.len(), 1);
        assert_eq!(same_price.duplicates.len(), 1);

        let different_price =
            deduplicate(vec![product("", "Milk 2L", 3.5), product("", "Milk 2L", 3.6)]);
        assert_eq!(different_price.unique.len(), 2);
        assert!(different_price.is_clean());
    }

    #[test]
    fn real_ids_and_pseudo_keys_do_not_collide() {
        let outcome =
            deduplicate(vec![product("Milk-3.5", "Other", 1.0), product("", "Milk", 3.5)]);
        assert_eq!(outcome.unique.len(), 2);
    }

    #[test]
    fn stats_describe_the_last_call_only() {
        let first = deduplicate(vec![product("1", "A", 1.0), product("1", "A", 1.0)]);
        assert_eq!(first.stats, ProductStats::new(2, 1));
        assert!((first.duplicate_rate() - 0.5).abs() < f64::EPSILON);

        let second = deduplicate(vec![product("2", "B", 1.0)]);
        assert_eq!(
            second.stats,
            ProductStats {
                total_before: 1,
                total_after: 1,
                duplicates_removed: 0
            }
        );
    }

    #[test]
    fn empty_input() {
        let outcome = deduplicate(Vec::new());
        assert_eq!(outcome, DedupOutcome::default());
        assert_eq!(outcome.duplicate_rate(), 0.0);
    }
}
