//! The in-memory aggregation tree: category → subcategory → items.
//!
//! Nodes keep discovery order, so reports walk categories in the order the
//! crawl first saw them. Counts are maintained on fold and obey the
//! invariant that subcategory counts sum to the category count, and
//! category counts sum to the catalog size.

use crate::catalog::Item;

/// A top-level grouping and its per-subcategory breakdown.
#[derive(Debug, Default, Clone)]
pub struct CategoryNode {
    pub title: String,
    pub count: usize,
    pub subcategories: Vec<SubcategoryNode>,
}

/// A second-level grouping holding the items discovered under it, in
/// discovery order.
#[derive(Debug, Default, Clone)]
pub struct SubcategoryNode {
    pub title: String,
    pub count: usize,
    pub items: Vec<Item>,
}

/// Insertion-ordered two-level aggregation index over catalog items.
#[derive(Debug, Default)]
pub struct AggregationTree {
    categories: Vec<CategoryNode>,
}

impl AggregationTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one item into the tree, creating category/subcategory nodes on
    /// first sight and bumping both counts.
    ///
    /// Returns the positions of the item as (category, subcategory, item)
    /// indices; positions are stable because the tree is append-only.
    pub fn fold(&mut self, item: Item) -> (usize, usize, usize) {
        let cat_idx = match self
            .categories
            .iter()
            .position(|c| c.title == item.category())
        {
            Some(idx) => idx,
            None => {
                self.categories.push(CategoryNode {
                    title: item.category().to_string(),
                    count: 0,
                    subcategories: Vec::new(),
                });
                self.categories.len() - 1
            }
        };

        let category = &mut self.categories[cat_idx];
        let sub_idx = match category
            .subcategories
            .iter()
            .position(|s| s.title == item.subcategory())
        {
            Some(idx) => idx,
            None => {
                category.subcategories.push(SubcategoryNode {
                    title: item.subcategory().to_string(),
                    count: 0,
                    items: Vec::new(),
                });
                category.subcategories.len() - 1
            }
        };

        category.count += 1;
        let subcategory = &mut category.subcategories[sub_idx];
        subcategory.count += 1;
        subcategory.items.push(item);
        let item_idx = subcategory.items.len() - 1;

        (cat_idx, sub_idx, item_idx)
    }

    pub fn categories(&self) -> &[CategoryNode] {
        &self.categories
    }

    pub fn get(&self, position: (usize, usize, usize)) -> Option<&Item> {
        let (cat, sub, item) = position;
        self.categories
            .get(cat)?
            .subcategories
            .get(sub)?
            .items
            .get(item)
    }

    /// Total items across all categories.
    pub fn total(&self) -> usize {
        self.categories.iter().map(|c| c.count).sum()
    }

    /// True when every non-empty category holds all of its items in a
    /// single subcategory, meaning the sample has zero subcategory
    /// diversity. An empty tree is not considered collapsed.
    pub fn collapsed_to_single_subcategory(&self) -> bool {
        let occupied: Vec<_> = self.categories.iter().filter(|c| c.count > 0).collect();
        !occupied.is_empty()
            && occupied
                .iter()
                .all(|c| c.subcategories.iter().filter(|s| s.count > 0).count() == 1)
    }
}
