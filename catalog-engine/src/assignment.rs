//! Bulk category assignment
//!
//! A bulk operation moves through IDLE → COMPUTING → APPLYING →
//! DONE(succeeded, failed). Computing is pure and touches no I/O;
//! applying fans out one write per product, tolerates partial failure,
//! and never retries. Failed products are re-submitted explicitly by
//! the operator.

use crate::identity;
use crate::membership;
use crate::store::ProductStore;
use futures::future::join_all;
use shared::error::{CatalogError, CatalogResult};
use shared::models::{Category, Product};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// How checked/unchecked checkbox state is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentMode {
    /// Only categories whose checkbox changed are touched: newly
    /// checked are added, newly unchecked removed, everything else on
    /// the product (orphans included) survives unmodified.
    AddRemove,
    /// The tag list becomes exactly the checked set; all prior tags,
    /// orphans included, are discarded.
    Replace,
}

/// New tag list per product id. Keyed by id, so a batch can never issue
/// two writes to the same product.
pub type AssignmentPlan = BTreeMap<String, Vec<String>>;

/// One failed product write within a batch.
#[derive(Debug, Clone)]
pub struct ProductWriteError {
    pub product_id: String,
    pub reason: String,
}

/// Batch result. Partial failure is an outcome, not an error.
#[derive(Debug, Clone, Default)]
pub struct BulkOutcome {
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<ProductWriteError>,
}

/// A product whose orphaned tags would be (or were) pruned.
#[derive(Debug, Clone)]
pub struct PruneReport {
    pub product_id: String,
    pub removed: Vec<String>,
    /// Set when the prune write failed (never set on a dry run).
    pub error: Option<String>,
}

/// Compute the new tag list per selected product. Pure: no I/O, no
/// store access.
///
/// Checked and unchecked sets are given as store ids and resolved to
/// canonical identifiers before any set arithmetic, so the write side
/// uses exactly the identifiers the read side matches on.
pub fn compute_assignment(
    products: &[Product],
    categories: &[Category],
    checked: &[String],
    unchecked: &[String],
    mode: AssignmentMode,
) -> CatalogResult<AssignmentPlan> {
    if mode == AssignmentMode::AddRemove && checked.is_empty() && unchecked.is_empty() {
        return Err(CatalogError::NoChangeRequested);
    }

    let checked_cats = resolve_categories(categories, checked)?;
    let unchecked_cats = resolve_categories(categories, unchecked)?;

    let mut plan = AssignmentPlan::new();
    for product in products {
        let Some(id) = product.id.clone() else {
            tracing::warn!(name = %product.name, "skipping unpersisted product in bulk plan");
            continue;
        };
        let new_tags = match mode {
            AssignmentMode::Replace => {
                let mut seen = HashSet::new();
                checked_cats
                    .iter()
                    .map(|cat| identity::canonical_identifier(cat))
                    .filter(|ident| seen.insert(ident.clone()))
                    .collect()
            }
            AssignmentMode::AddRemove => {
                let mut tags: Vec<String> = Vec::new();
                let mut seen = HashSet::new();
                for tag in &product.category_tags {
                    if unchecked_cats.iter().any(|cat| identity::matches(cat, tag)) {
                        continue;
                    }
                    if seen.insert(tag.clone()) {
                        tags.push(tag.clone());
                    }
                }
                for cat in &checked_cats {
                    // Already a member under any identifier scheme: leave
                    // the existing representation alone.
                    if tags.iter().any(|tag| identity::matches(cat, tag)) {
                        continue;
                    }
                    let ident = identity::canonical_identifier(cat);
                    if seen.insert(ident.clone()) {
                        tags.push(ident);
                    }
                }
                tags
            }
        };
        plan.insert(id, new_tags);
    }
    Ok(plan)
}

fn resolve_categories<'a>(
    categories: &'a [Category],
    store_ids: &[String],
) -> CatalogResult<Vec<&'a Category>> {
    store_ids
        .iter()
        .map(|store_id| {
            categories
                .iter()
                .find(|cat| cat.id.as_deref() == Some(store_id.as_str()))
                .ok_or_else(|| {
                    CatalogError::Validation(format!("unknown category store id '{store_id}'"))
                })
        })
        .collect()
}

pub struct BulkAssignmentEngine {
    products: Arc<ProductStore>,
    applying: AtomicBool,
}

impl BulkAssignmentEngine {
    pub fn new(products: Arc<ProductStore>) -> Self {
        Self {
            products,
            applying: AtomicBool::new(false),
        }
    }

    /// Apply a computed plan, one independent write per product.
    ///
    /// Writes to distinct products proceed concurrently; one product's
    /// failure never blocks or rolls back its siblings. A second batch
    /// started while one is applying is rejected.
    pub async fn apply(&self, plan: AssignmentPlan) -> CatalogResult<BulkOutcome> {
        if self.applying.swap(true, Ordering::SeqCst) {
            return Err(CatalogError::BatchInProgress);
        }
        let outcome = self.apply_inner(plan).await;
        self.applying.store(false, Ordering::SeqCst);
        Ok(outcome)
    }

    async fn apply_inner(&self, plan: AssignmentPlan) -> BulkOutcome {
        let writes = plan.into_iter().map(|(product_id, tags)| {
            let products = Arc::clone(&self.products);
            async move {
                match products.set_category_tags(&product_id, tags).await {
                    Ok(_) => Ok(()),
                    Err(err) => Err(ProductWriteError {
                        product_id,
                        reason: err.to_string(),
                    }),
                }
            }
        });

        let mut outcome = BulkOutcome::default();
        for result in join_all(writes).await {
            match result {
                Ok(()) => outcome.succeeded += 1,
                Err(err) => {
                    tracing::error!(
                        product_id = %err.product_id,
                        reason = %err.reason,
                        "bulk assignment write failed"
                    );
                    outcome.failed += 1;
                    outcome.errors.push(err);
                }
            }
        }
        tracing::info!(
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "bulk assignment batch done"
        );
        outcome
    }

    /// Remove tags matching no current category. With `dry_run` the
    /// report is computed but nothing is written; the operator previews
    /// first, then re-invokes for real.
    pub async fn prune_orphans(
        &self,
        products: &[Product],
        categories: &[Category],
        dry_run: bool,
    ) -> CatalogResult<Vec<PruneReport>> {
        let mut candidates = Vec::new();
        for product in products {
            let removed = membership::orphaned_tags(product, categories);
            if removed.is_empty() {
                continue;
            }
            let Some(id) = product.id.clone() else {
                continue;
            };
            let kept: Vec<String> = product
                .category_tags
                .iter()
                .filter(|tag| !removed.contains(tag))
                .cloned()
                .collect();
            candidates.push((id, removed, kept));
        }

        if dry_run {
            return Ok(candidates
                .into_iter()
                .map(|(product_id, removed, _)| PruneReport {
                    product_id,
                    removed,
                    error: None,
                })
                .collect());
        }

        if self.applying.swap(true, Ordering::SeqCst) {
            return Err(CatalogError::BatchInProgress);
        }
        let writes = candidates.into_iter().map(|(product_id, removed, kept)| {
            let products = Arc::clone(&self.products);
            async move {
                let error = products
                    .set_category_tags(&product_id, kept)
                    .await
                    .err()
                    .map(|err| err.to_string());
                PruneReport {
                    product_id,
                    removed,
                    error,
                }
            }
        });
        let reports = join_all(writes).await;
        self.applying.store(false, Ordering::SeqCst);
        Ok(reports)
    }
}
