//! Product store
//!
//! Writes are persist-then-commit: the in-memory copy is only updated
//! once the backend accepted the write, so a failed write leaves the
//! working set exactly as it was.

use crate::backend::{BackendError, CatalogBackend};
use parking_lot::RwLock;
use shared::error::{CatalogError, CatalogResult};
use shared::models::Product;
use std::sync::Arc;

pub struct ProductStore {
    backend: Arc<dyn CatalogBackend>,
    cache: RwLock<Vec<Product>>,
}

impl ProductStore {
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        Self {
            backend,
            cache: RwLock::new(Vec::new()),
        }
    }

    /// Refresh from the backend. When unreachable, the copy from the
    /// last successful refresh is served; products have no built-in
    /// defaults, so a first load with no backend is an error.
    pub async fn list(&self) -> CatalogResult<Vec<Product>> {
        match self.backend.list_products().await {
            Ok(products) => {
                tracing::info!(count = products.len(), "loaded products from backend");
                *self.cache.write() = products.clone();
                Ok(products)
            }
            Err(err) => {
                let cached = self.cache.read().clone();
                if cached.is_empty() {
                    Err(err.into())
                } else {
                    tracing::warn!(error = %err, "product backend unavailable, serving cached copy");
                    Ok(cached)
                }
            }
        }
    }

    /// Case-insensitive substring search over product name or any
    /// category tag, against the cached working set.
    pub fn search(&self, term: &str) -> Vec<Product> {
        let needle = term.to_lowercase();
        self.cache
            .read()
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.category_tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    /// Persist a product's new tag list, then update the in-memory copy.
    /// On failure the in-memory copy is untouched.
    pub async fn set_category_tags(&self, id: &str, tags: Vec<String>) -> CatalogResult<Product> {
        let updated = self
            .backend
            .update_product_categories(id, tags)
            .await
            .map_err(|err| match err {
                BackendError::NotFound(msg) => CatalogError::NotFound(msg),
                other => CatalogError::PersistenceFailed {
                    product_id: id.to_string(),
                    reason: other.to_string(),
                },
            })?;

        let mut cache = self.cache.write();
        if let Some(existing) = cache.iter_mut().find(|p| p.id.as_deref() == Some(id)) {
            *existing = updated.clone();
        }
        Ok(updated)
    }

    /// Cached working-set copy (tests and views).
    pub fn cached(&self) -> Vec<Product> {
        self.cache.read().clone()
    }
}
