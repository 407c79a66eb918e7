//! 소매점 특성 및 도메인 상수들
//!
//! 스크래핑 대상 소매점(Coles)의 고유한 특성과 카탈로그 처리 상수들을 정의합니다.

/// 소매점 식별 상수들
pub mod vendor {
    /// Canonical vendor literal stamped onto every product.
    ///
    /// Always overrides whatever the scraper put in the `vendor` field.
    pub const NAME: &str = "coles";

    /// Human readable retailer name used in report headers
    pub const DISPLAY_NAME: &str = "Coles";

    /// Prefix of per-category output and dump file names
    pub const FILE_PREFIX: &str = "coles";
}

/// 카테고리 관련 상수들
pub mod categories {
    /// Default category targets: (category name, browse URL)
    pub const DEFAULT_TARGETS: &[(&str, &str)] = &[
        ("bakery", "https://www.coles.com.au/browse/bakery"),
        ("fruit-vegetables", "https://www.coles.com.au/browse/fruit-vegetables"),
        ("meat-seafood", "https://www.coles.com.au/browse/meat-seafood"),
        ("dairy-eggs-fridge", "https://www.coles.com.au/browse/dairy-eggs-fridge"),
        ("pantry", "https://www.coles.com.au/browse/pantry"),
        ("frozen", "https://www.coles.com.au/browse/frozen"),
        ("drinks", "https://www.coles.com.au/browse/drinks"),
        ("snacks", "https://www.coles.com.au/browse/chips-chocolates-snacks"),
        ("household", "https://www.coles.com.au/browse/household"),
        ("health-beauty", "https://www.coles.com.au/browse/health-beauty"),
        ("baby", "https://www.coles.com.au/browse/baby"),
        ("pet", "https://www.coles.com.au/browse/pet"),
        ("deli", "https://www.coles.com.au/browse/deli"),
        ("liquor", "https://www.coles.com.au/browse/liquor"),
    ];
}

/// 업로드 관련 상수들
pub mod upload {
    /// 한 번의 upsert 요청에 담기는 최대 제품 수
    pub const DEFAULT_BATCH_SIZE: usize = 100;
}

/// 리포트 포맷 상수들
pub mod report {
    /// 리포트 생성 시각 포맷
    pub const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// 출력 파일 이름에 붙는 실행 스탬프 포맷
    pub const RUN_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
}
