//! In-memory backend
//!
//! Used when no document database is configured at all, and as the
//! test double for the engine: outages and per-product write failures
//! can be injected to exercise the fallback and partial-failure paths.

use super::{BackendError, BackendResult, CatalogBackend};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::{Category, CategoryCreate, CategoryUpdate, Product};
use shared::util::{now_iso, snowflake_id};
use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub struct MemoryBackend {
    categories: RwLock<HashMap<String, Category>>,
    products: RwLock<HashMap<String, Product>>,
    /// Simulated outage: every operation reports Unavailable.
    unavailable: RwLock<bool>,
    /// Product ids whose writes report WriteFailed.
    failing_products: RwLock<HashSet<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing data, preserving the given ids.
    pub fn with_data(categories: Vec<Category>, products: Vec<Product>) -> Self {
        let backend = Self::new();
        {
            let mut cats = backend.categories.write();
            for cat in categories {
                if let Some(id) = cat.id.clone() {
                    cats.insert(id, cat);
                }
            }
        }
        {
            let mut prods = backend.products.write();
            for product in products {
                if let Some(id) = product.id.clone() {
                    prods.insert(id, product);
                }
            }
        }
        backend
    }

    /// Toggle a simulated outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write() = unavailable;
    }

    /// Make every future write to the given product fail.
    pub fn fail_writes_for(&self, product_id: &str) {
        self.failing_products.write().insert(product_id.to_string());
    }

    fn check_available(&self) -> BackendResult<()> {
        if *self.unavailable.read() {
            return Err(BackendError::Unavailable(
                "in-memory backend marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogBackend for MemoryBackend {
    async fn list_categories(&self) -> BackendResult<Vec<Category>> {
        self.check_available()?;
        let mut categories: Vec<Category> = self.categories.read().values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn create_category(&self, draft: CategoryCreate) -> BackendResult<Category> {
        self.check_available()?;
        let mut categories = self.categories.write();
        if categories.values().any(|c| c.name == draft.name) {
            return Err(BackendError::Duplicate(format!(
                "Category '{}' already exists",
                draft.name
            )));
        }
        let mut category = Category::from_create(draft);
        category.id = Some(snowflake_id().to_string());
        category.created_at = Some(now_iso());
        let id = category.id.clone().unwrap_or_default();
        categories.insert(id, category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: &str, patch: CategoryUpdate) -> BackendResult<Category> {
        self.check_available()?;
        let mut categories = self.categories.write();
        let category = categories
            .get_mut(id)
            .ok_or_else(|| BackendError::NotFound(format!("Category {} not found", id)))?;
        category.apply_update(patch);
        category.updated_at = Some(now_iso());
        Ok(category.clone())
    }

    async fn delete_category(&self, id: &str) -> BackendResult<()> {
        self.check_available()?;
        self.categories
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| BackendError::NotFound(format!("Category {} not found", id)))
    }

    async fn list_products(&self) -> BackendResult<Vec<Product>> {
        self.check_available()?;
        let mut products: Vec<Product> = self.products.read().values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn update_product_categories(
        &self,
        id: &str,
        tags: Vec<String>,
    ) -> BackendResult<Product> {
        self.check_available()?;
        if self.failing_products.read().contains(id) {
            return Err(BackendError::WriteFailed(format!(
                "injected failure for product {}",
                id
            )));
        }
        let mut products = self.products.write();
        let product = products
            .get_mut(id)
            .ok_or_else(|| BackendError::NotFound(format!("Product {} not found", id)))?;
        product.category_tags = tags;
        product.updated_at = Some(now_iso());
        Ok(product.clone())
    }
}
