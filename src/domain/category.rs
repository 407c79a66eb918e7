//! 카테고리 대상 정의와 선택 로직

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::constants::categories::DEFAULT_TARGETS;

/// 처리 대상 카테고리 (이름 + 탐색 URL)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTarget {
    pub name: String,
    pub url: String,
}

impl CategoryTarget {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// 기본 카테고리 목록
    pub fn defaults() -> Vec<Self> {
        DEFAULT_TARGETS
            .iter()
            .map(|(name, url)| Self::new(*name, *url))
            .collect()
    }

    fn matches_any(&self, tokens: &[String]) -> bool {
        let url = self.url.to_lowercase();
        tokens.iter().any(|token| url.contains(token.as_str()))
    }
}

/// 쉼표로 구분된 필터로 카테고리 선택
///
/// 토큰이 URL에 포함되면 (대소문자 무시) 선택됩니다. 필터가 비어 있거나
/// 아무것도 일치하지 않으면 전체 목록을 사용합니다.
pub fn select_categories<'a>(
    targets: &'a [CategoryTarget],
    filter: Option<&str>,
) -> Vec<&'a CategoryTarget> {
    let tokens: Vec<String> = filter
        .unwrap_or_default()
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.is_empty() {
        return targets.iter().collect();
    }

    let selected: Vec<&CategoryTarget> = targets
        .iter()
        .filter(|target| target.matches_any(&tokens))
        .collect();

    if selected.is_empty() {
        warn!(
            "⚠️ No categories matched filter '{}', using all {} categories",
            tokens.join(","),
            targets.len()
        );
        return targets.iter().collect();
    }

    info!("Filtered to {} of {} categories", selected.len(), targets.len());
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn names<'a>(selected: &[&'a CategoryTarget]) -> Vec<&'a str> {
        selected.iter().map(|target| target.name.as_str()).collect()
    }

    #[rstest]
    #[case(None, 14)]
    #[case(Some(""), 14)]
    #[case(Some(" , "), 14)]
    #[case(Some("bakery"), 1)]
    #[case(Some("BAKERY, pet"), 2)]
    #[case(Some("does-not-exist"), 14)]
    fn filter_selects_by_url_substring(#[case] filter: Option<&str>, #[case] expected: usize) {
        let targets = CategoryTarget::defaults();
        assert_eq!(select_categories(&targets, filter).len(), expected);
    }

    #[test]
    fn filter_matches_url_not_name() {
        let targets = CategoryTarget::defaults();
        let selected = select_categories(&targets, Some("chips-chocolates"));
        assert_eq!(names(&selected), ["snacks"]);
    }

    #[test]
    fn selection_keeps_configured_order() {
        let targets = vec![
            CategoryTarget::new("b", "https://example.test/browse/b"),
            CategoryTarget::new("a", "https://example.test/browse/a"),
        ];
        let selected = select_categories(&targets, Some("browse"));
        assert_eq!(names(&selected), ["b", "a"]);
    }
}
