//! # Cross-Category Duplicate Finder
//!
//! Finds product ids that show up under more than one category once every
//! category has been deduplicated on its own. Products without a real id
//! cannot be matched across categories and are ignored here.

use std::collections::{BTreeSet, HashMap};

use tracing::info;

use crate::domain::product::CanonicalProduct;

/// All sightings of one product id across categories
#[derive(Debug, Clone, PartialEq)]
pub struct CrossCategoryGroup {
    pub id: String,
    pub occurrences: Vec<(String, CanonicalProduct)>,
}

impl CrossCategoryGroup {
    /// Distinct category names, sorted
    pub fn categories(&self) -> Vec<&str> {
        self.occurrences
            .iter()
            .map(|(category, _)| category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Title of the first sighting
    pub fn title(&self) -> &str {
        self.occurrences
            .first()
            .map_or("Unknown", |(_, product)| product.title.as_str())
    }
}

/// Cross-category groups in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrossCategoryDuplicates {
    groups: Vec<CrossCategoryGroup>,
}

impl CrossCategoryDuplicates {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CrossCategoryGroup> {
        self.groups.iter()
    }

    pub fn get(&self, id: &str) -> Option<&CrossCategoryGroup> {
        self.groups.iter().find(|group| group.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.id.as_str())
    }
}

impl<'a> IntoIterator for &'a CrossCategoryDuplicates {
    type Item = &'a CrossCategoryGroup;
    type IntoIter = std::slice::Iter<'a, CrossCategoryGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Group products of every category by id and keep ids seen in two or more categories.
///
/// Output order follows the first sighting of each id while walking
/// categories in the given order and products in list order.
pub fn find_cross_category_duplicates<'a, I, C>(by_category: I) -> CrossCategoryDuplicates
where
    I: IntoIterator<Item = (C, &'a [CanonicalProduct])>,
    C: AsRef<str>,
{
    let mut groups: Vec<CrossCategoryGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (category, products) in by_category {
        let category = category.as_ref();
        for product in products.iter().filter(|product| product.has_id()) {
            let slot = *index.entry(product.id.clone()).or_insert_with(|| {
                groups.push(CrossCategoryGroup {
                    id: product.id.clone(),
                    occurrences: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot]
                .occurrences
                .push((category.to_string(), product.clone()));
        }
    }

    groups.retain(|group| group.categories().len() > 1);
    info!("Found {} products appearing in multiple categories", groups.len());

    CrossCategoryDuplicates { groups }
}

/// One title carried by several distinct product ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleCollision {
    pub title: String,
    /// Distinct ids, sorted
    pub ids: Vec<String>,
    /// Distinct categories, sorted
    pub categories: Vec<String>,
}

/// Titles shared by products with different ids (possible duplicate listings under other SKUs)
pub fn find_title_collisions<'a, I, C>(by_category: I) -> Vec<TitleCollision>
where
    I: IntoIterator<Item = (C, &'a [CanonicalProduct])>,
    C: AsRef<str>,
{
    let mut order: Vec<String> = Vec::new();
    let mut by_title: HashMap<String, (BTreeSet<String>, BTreeSet<String>)> = HashMap::new();

    for (category, products) in by_category {
        let category = category.as_ref();
        for product in products.iter().filter(|product| product.has_id()) {
            let entry = by_title.entry(product.title.clone()).or_insert_with(|| {
                order.push(product.title.clone());
                (BTreeSet::new(), BTreeSet::new())
            });
            entry.0.insert(product.id.clone());
            entry.1.insert(category.to_string());
        }
    }

    order
        .into_iter()
        .filter_map(|title| {
            let (ids, categories) = by_title.remove(&title)?;
            (ids.len() > 1).then(|| TitleCollision {
                title,
                ids: ids.into_iter().collect(),
                categories: categories.into_iter().collect(),
            })
        })
        .collect()
}
