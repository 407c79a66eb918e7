//! Plain-text reports
//!
//! Rendering only: callers supply the generation time so the output is
//! reproducible.

use chrono::NaiveDateTime;

use super::cross_category::{CrossCategoryDuplicates, TitleCollision};
use crate::domain::constants::{report::GENERATED_AT_FORMAT, vendor};
use crate::domain::document::CategoryMetadata;
use crate::domain::product::CanonicalProduct;
use crate::domain::stats::{ProductStats, RunSummary};

fn generated_on(generated_at: &NaiveDateTime) -> String {
    format!("Generated on: {}", generated_at.format(GENERATED_AT_FORMAT))
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() { placeholder } else { value }
}

/// Duplicate removal report for one category
pub fn render_duplicate_report(
    duplicates: &[CanonicalProduct],
    category: &str,
    stats: &ProductStats,
    generated_at: &NaiveDateTime,
) -> String {
    let mut lines = vec![
        format!("Duplicate Removal Report for {} {}", vendor::DISPLAY_NAME, category),
        generated_on(generated_at),
        String::new(),
        format!("Total products before removal: {}", stats.total_before),
        format!("Unique products after removal: {}", stats.total_after),
        format!("Duplicates removed: {}", stats.duplicates_removed),
        String::new(),
    ];

    if duplicates.is_empty() {
        lines.push("No duplicate products found.".to_string());
    } else {
        lines.push("Removed duplicate products:".to_string());
        for (i, product) in duplicates.iter().enumerate() {
            lines.push(format!(
                "{}. ID: {} - {}",
                i + 1,
                or_placeholder(&product.id, "Unknown"),
                or_placeholder(&product.title, "Unknown")
            ));
            lines.push(format!(
                "   Price: ${:.2}, Category: {}",
                product.price_value,
                or_placeholder(&product.category, "N/A")
            ));
            if product.is_on_special {
                lines.push(format!(
                    "   Special: {}",
                    or_placeholder(&product.special_text, "Yes")
                ));
            }
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

/// Cross-category report, followed by titles shared across different ids
pub fn render_cross_category_report(
    cross: &CrossCategoryDuplicates,
    collisions: &[TitleCollision],
    generated_at: &NaiveDateTime,
) -> String {
    let mut lines = vec![
        "Cross-Category Duplicates Report".to_string(),
        generated_on(generated_at),
        String::new(),
        format!("Found {} products appearing in multiple categories", cross.len()),
        String::new(),
    ];

    for (i, group) in cross.iter().enumerate() {
        let categories = group.categories();
        lines.push(format!("{}. ID: {} - {}", i + 1, group.id, group.title()));
        lines.push(format!(
            "   Found in {} categories: {}",
            categories.len(),
            categories.join(", ")
        ));
        lines.push(String::new());
    }

    if !collisions.is_empty() {
        lines.push(format!(
            "Found {} product titles with different IDs",
            collisions.len()
        ));
        lines.push(String::new());
        for (i, collision) in collisions.iter().enumerate() {
            lines.push(format!("{}. Title: {}", i + 1, collision.title));
            lines.push(format!("   IDs: {}", collision.ids.join(", ")));
            lines.push(format!("   Categories: {}", collision.categories.join(", ")));
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

/// One summary line per category
pub fn render_category_line(metadata: &CategoryMetadata) -> String {
    let mut line = format!("{}: {} products", metadata.category, metadata.actual_products);
    if let Some(coverage) = metadata.coverage_percent() {
        line.push_str(&format!(
            ", expected: {} ({:.1}%)",
            metadata.expected_products, coverage
        ));
    }
    line.push_str(&format!(", duplicates removed: {}", metadata.duplicates_removed));
    line
}

/// Run summary text
pub fn render_run_summary(
    summary: &RunSummary,
    categories: &[CategoryMetadata],
    started_at: &NaiveDateTime,
    completed_at: &NaiveDateTime,
) -> String {
    let mut lines = vec![
        format!(
            "{} Scraping Run - {}",
            vendor::DISPLAY_NAME,
            started_at.format(GENERATED_AT_FORMAT)
        ),
        format!("Run ID: {}", summary.run_id),
        format!("Categories to scrape: {}", summary.categories_attempted),
        String::new(),
    ];

    lines.extend(categories.iter().map(render_category_line));

    lines.push(String::new());
    lines.push("Summary:".to_string());
    lines.push(format!(
        "Total categories scraped successfully: {}/{}",
        summary.categories_successful, summary.categories_attempted
    ));
    lines.push(format!("Total products found: {}", summary.total_products));
    lines.push(format!(
        "Products appearing in multiple categories: {}",
        summary.cross_category_duplicates
    ));
    lines.push(format!(
        "Scraping completed at: {}",
        completed_at.format(GENERATED_AT_FORMAT)
    ));
    lines.push(String::new());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cross_category::find_cross_category_duplicates;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .and_then(|date| date.and_hms_opt(10, 15, 0))
            .expect("valid timestamp")
    }

    fn duplicate(id: &str, title: &str, special: Option<&str>) -> CanonicalProduct {
        let mut product = CanonicalProduct::titled(title);
        product.id = id.to_string();
        product.price_value = 3.5;
        product.category = "dairy".to_string();
        if let Some(text) = special {
            product.is_on_special = true;
            product.special_text = text.to_string();
        }
        product
    }

    #[test]
    fn duplicate_report_lists_each_duplicate() {
        let report = render_duplicate_report(
            &[duplicate("123", "Milk 2L", Some("Half Price")), duplicate("", "Cream", None)],
            "dairy",
            &ProductStats::new(5, 3),
            &at(),
        );

        assert!(report.starts_with("Duplicate Removal Report for Coles dairy\n"));
        assert!(report.contains("Generated on: 2025-03-01 10:15:00"));
        assert!(report.contains("Total products before removal: 5"));
        assert!(report.contains("Unique products after removal: 3"));
        assert!(report.contains("Duplicates removed: 2"));
        assert!(report.contains("1. ID: 123 - Milk 2L"));
        assert!(report.contains("   Price: $3.50, Category: dairy"));
        assert!(report.contains("   Special: Half Price"));
        assert!(report.contains("2. ID: Unknown - Cream"));
        assert_eq!(report.matches("Special:").count(), 1);
    }

    #[test]
    fn empty_category_reports_zero_duplicates() {
        let report = render_duplicate_report(&[], "pet", &ProductStats::default(), &at());
        assert!(report.contains("Duplicates removed: 0"));
        assert!(report.contains("No duplicate products found."));
    }

    #[test]
    fn cross_category_report_lists_sorted_categories() {
        let dairy = vec![duplicate("999", "Butter", None)];
        let bakery = vec![duplicate("999", "Butter", None)];
        let cross = find_cross_category_duplicates([
            ("dairy", dairy.as_slice()),
            ("bakery", bakery.as_slice()),
        ]);

        let report = render_cross_category_report(&cross, &[], &at());
        assert!(report.contains("Found 1 products appearing in multiple categories"));
        assert!(report.contains("1. ID: 999 - Butter"));
        assert!(report.contains("   Found in 2 categories: bakery, dairy"));
        assert!(!report.contains("different IDs"));
    }

    #[test]
    fn category_line_includes_coverage_only_when_expected_is_known() {
        let mut metadata = CategoryMetadata {
            category: "bakery".to_string(),
            url: String::new(),
            timestamp: String::new(),
            expected_products: 8,
            actual_products: 6,
            duplicates_removed: 2,
            pages_scraped: 1,
            vendor: "coles".to_string(),
        };
        assert_eq!(
            render_category_line(&metadata),
            "bakery: 6 products, expected: 8 (75.0%), duplicates removed: 2"
        );

        metadata.expected_products = 0;
        assert_eq!(
            render_category_line(&metadata),
            "bakery: 6 products, duplicates removed: 2"
        );
    }
}
