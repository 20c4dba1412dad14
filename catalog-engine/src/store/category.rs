//! Category store
//!
//! Fallback chain on load: live backend, then the in-memory copy from
//! the last successful refresh, then the on-disk snapshot, then the
//! built-in seed catalog. A session that has ever seen real data never
//! silently degrades to an empty list.

use crate::backend::CatalogBackend;
use crate::identity;
use crate::snapshot::SnapshotStore;
use parking_lot::RwLock;
use shared::error::{CatalogError, CatalogResult};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use std::sync::Arc;
use validator::Validate;

/// Where a category listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySource {
    Backend,
    /// In-memory copy from the last successful refresh; backend was
    /// unreachable. Surfaced so the UI can warn without failing.
    Cache,
    /// On-disk snapshot from a previous session.
    Snapshot,
    /// Built-in seed catalog; no prior state existed at all.
    Defaults,
}

/// A category listing plus its provenance.
#[derive(Debug, Clone)]
pub struct CategoryListing {
    pub categories: Vec<Category>,
    pub source: CategorySource,
}

pub struct CategoryStore {
    backend: Arc<dyn CatalogBackend>,
    snapshot: Option<SnapshotStore>,
    cache: RwLock<Vec<Category>>,
}

impl CategoryStore {
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        Self {
            backend,
            snapshot: None,
            cache: RwLock::new(Vec::new()),
        }
    }

    /// Attach an on-disk snapshot cache for cross-session fallback.
    pub fn with_snapshot(mut self, snapshot: SnapshotStore) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Refresh from the backend, falling back per the chain above.
    pub async fn list(&self) -> CategoryListing {
        match self.backend.list_categories().await {
            Ok(categories) if categories.is_empty() && self.cache.read().is_empty() => {
                // Reachable but empty backend on first load: seed catalog
                tracing::info!("category backend empty, serving built-in defaults");
                let defaults = default_categories();
                *self.cache.write() = defaults.clone();
                CategoryListing {
                    categories: defaults,
                    source: CategorySource::Defaults,
                }
            }
            Ok(categories) => {
                tracing::info!(count = categories.len(), "loaded categories from backend");
                *self.cache.write() = categories.clone();
                if let Some(snapshot) = &self.snapshot
                    && let Err(err) = snapshot.save_categories(&categories)
                {
                    tracing::warn!(error = %err, "failed to persist category snapshot");
                }
                CategoryListing {
                    categories,
                    source: CategorySource::Backend,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "category backend unavailable, falling back");
                self.fallback_listing()
            }
        }
    }

    fn fallback_listing(&self) -> CategoryListing {
        let cached = self.cache.read().clone();
        if !cached.is_empty() {
            return CategoryListing {
                categories: cached,
                source: CategorySource::Cache,
            };
        }
        if let Some(snapshot) = &self.snapshot {
            match snapshot.load_categories() {
                Ok(Some(categories)) if !categories.is_empty() => {
                    *self.cache.write() = categories.clone();
                    return CategoryListing {
                        categories,
                        source: CategorySource::Snapshot,
                    };
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "failed to read category snapshot");
                }
            }
        }
        let defaults = default_categories();
        *self.cache.write() = defaults.clone();
        CategoryListing {
            categories: defaults,
            source: CategorySource::Defaults,
        }
    }

    /// Create a category, deriving the canonical tag from the name when
    /// the author supplied none. Callers re-`list()` afterwards; the
    /// backend owns store-id generation.
    pub async fn add(&self, mut draft: CategoryCreate) -> CatalogResult<Category> {
        draft
            .validate()
            .map_err(|err| CatalogError::Validation(err.to_string()))?;
        if draft.canonical_tag.is_none() {
            let slug = identity::slugify(&draft.name);
            if !slug.is_empty() {
                draft.canonical_tag = Some(slug);
            }
        }
        Ok(self.backend.create_category(draft).await?)
    }

    pub async fn update(&self, id: &str, patch: CategoryUpdate) -> CatalogResult<Category> {
        Ok(self.backend.update_category(id, patch).await?)
    }

    pub async fn remove(&self, id: &str) -> CatalogResult<()> {
        Ok(self.backend.delete_category(id).await?)
    }
}

/// Built-in seed catalog, used only when no prior state exists.
pub fn default_categories() -> Vec<Category> {
    let entry = |tag: &str, name: &str, color: &str, special: bool, description: &str| Category {
        id: Some(tag.to_string()),
        canonical_tag: Some(tag.to_string()),
        name: name.to_string(),
        color: color.to_string(),
        image: String::new(),
        description: description.to_string(),
        is_special: special,
        created_at: None,
        updated_at: None,
    };
    vec![
        entry("all", "All Products", "#667eea", false, ""),
        entry(
            identity::TODAYS_OFFERS_TAG,
            identity::TODAYS_OFFERS_NAME,
            "#6c757d",
            true,
            "Limited time special offers and deals",
        ),
        entry("nike", "Nike", "#000000", false, ""),
        entry("adidas", "Adidas", "#0066cc", false, ""),
        entry("shoes", "Shoes", "#ff6b35", false, ""),
        entry("watches", "Watches", "#28a745", false, ""),
        entry("accessories", "Accessories", "#6f42c1", false, ""),
        entry("out-of-stock", "Out of Stock", "#ef4444", false, ""),
    ]
}
