//! Membership resolution
//!
//! Pure projections from the loaded working set to checkbox state. The
//! presentation layer consumes these synchronously after every mutation,
//! so the rendered view always reflects the latest computed membership
//! with no deferred re-checks.

use crate::identity;
use shared::models::{Category, Product};
use std::collections::HashSet;

/// Store ids of the categories this product belongs to.
///
/// A category is a member when any tag on the product matches it under
/// the identity rules. Categories without a store id (unpersisted
/// drafts) are skipped.
pub fn membership_of(product: &Product, categories: &[Category]) -> HashSet<String> {
    categories
        .iter()
        .filter(|cat| {
            product
                .category_tags
                .iter()
                .any(|tag| identity::matches(cat, tag))
        })
        .filter_map(|cat| cat.id.clone())
        .collect()
}

/// Tags on the product that match no current category.
///
/// Orphans are data drift from deleted or renamed categories. They are
/// flagged, never failed on; see the engine's prune operation for the
/// explicit cleanup path.
pub fn orphaned_tags(product: &Product, categories: &[Category]) -> Vec<String> {
    product
        .category_tags
        .iter()
        .filter(|tag| !categories.iter().any(|cat| identity::matches(cat, tag)))
        .cloned()
        .collect()
}

/// Store ids of the categories every given product belongs to.
///
/// Conjunction, not majority: one product missing a category removes it
/// from the common set. An empty product list yields an empty set.
pub fn common_membership(products: &[Product], categories: &[Category]) -> HashSet<String> {
    let mut iter = products.iter();
    let Some(first) = iter.next() else {
        return HashSet::new();
    };
    let mut common = membership_of(first, categories);
    for product in iter {
        if common.is_empty() {
            break;
        }
        let membership = membership_of(product, categories);
        common.retain(|id| membership.contains(id));
    }
    common
}
