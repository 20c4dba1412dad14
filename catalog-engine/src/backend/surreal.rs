//! SurrealDB document backend
//!
//! Categories and products live in the `category` and `product` tables.
//! Updates go through `UPDATE ... MERGE` with explicit bindings so
//! absent patch fields never clobber stored values.

use super::{BackendError, BackendResult, CatalogBackend};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::models::{Category, CategoryCreate, CategoryUpdate, Product, ProductCreate};
use shared::util::now_iso;
use surrealdb::engine::local::{Db, Mem};
use surrealdb::{RecordId, Surreal};

const CATEGORY_TABLE: &str = "category";
const PRODUCT_TABLE: &str = "product";

/// Extract the pure id if it contains a table prefix
/// (e.g. "category:xxx" -> "xxx")
fn pure_id<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

fn read_err(err: surrealdb::Error) -> BackendError {
    BackendError::Unavailable(err.to_string())
}

fn write_err(err: surrealdb::Error) -> BackendError {
    BackendError::WriteFailed(err.to_string())
}

// =============================================================================
// Record types (RecordId ids as stored; converted to string ids at the edge)
// =============================================================================

#[derive(Debug, Deserialize)]
struct CategoryRecord {
    id: RecordId,
    name: String,
    #[serde(default)]
    canonical_tag: Option<String>,
    #[serde(default)]
    color: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    is_special: bool,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

impl From<CategoryRecord> for Category {
    fn from(rec: CategoryRecord) -> Self {
        Category {
            id: Some(rec.id.key().to_string()),
            canonical_tag: rec.canonical_tag,
            name: rec.name,
            color: rec.color,
            image: rec.image,
            description: rec.description,
            is_special: rec.is_special,
            created_at: rec.created_at,
            updated_at: rec.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct CategoryContent {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    canonical_tag: Option<String>,
    color: String,
    image: String,
    description: String,
    is_special: bool,
    created_at: String,
}

#[derive(Debug, Serialize)]
struct CategoryMerge {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    canonical_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_special: Option<bool>,
    updated_at: String,
}

#[derive(Debug, Deserialize)]
struct ProductRecord {
    id: RecordId,
    name: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    price: Option<i64>,
    #[serde(default)]
    category_tags: Vec<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

impl From<ProductRecord> for Product {
    fn from(rec: ProductRecord) -> Self {
        Product {
            id: Some(rec.id.key().to_string()),
            name: rec.name,
            image: rec.image,
            price: rec.price,
            category_tags: rec.category_tags,
            updated_at: rec.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct ProductContent {
    name: String,
    image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<i64>,
    category_tags: Vec<String>,
    updated_at: String,
}

// =============================================================================
// SurrealBackend
// =============================================================================

#[derive(Clone)]
pub struct SurrealBackend {
    db: Surreal<Db>,
}

impl SurrealBackend {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Open an ephemeral in-memory database (tests and demos).
    pub async fn open_in_memory() -> BackendResult<Self> {
        let db = Surreal::new::<Mem>(()).await.map_err(read_err)?;
        db.use_ns("catalog")
            .use_db("catalog")
            .await
            .map_err(read_err)?;
        Ok(Self::new(db))
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Find category by name (duplicate check on create)
    async fn find_category_by_name(&self, name: &str) -> BackendResult<Option<Category>> {
        let name_owned = name.to_string();
        let mut result = self
            .db
            .query("SELECT * FROM category WHERE name = $name LIMIT 1")
            .bind(("name", name_owned))
            .await
            .map_err(read_err)?;
        let categories: Vec<CategoryRecord> = result.take(0).map_err(read_err)?;
        Ok(categories.into_iter().next().map(Into::into))
    }

    async fn find_category_by_id(&self, id: &str) -> BackendResult<Option<Category>> {
        let pure = pure_id(CATEGORY_TABLE, id);
        let category: Option<CategoryRecord> = self
            .db
            .select((CATEGORY_TABLE, pure))
            .await
            .map_err(read_err)?;
        Ok(category.map(Into::into))
    }

    /// Create a product (admin-side seeding; not part of the
    /// reconciliation surface, which only rewrites tag lists).
    pub async fn create_product(&self, draft: ProductCreate) -> BackendResult<Product> {
        let content = ProductContent {
            name: draft.name,
            image: draft.image.unwrap_or_default(),
            price: draft.price,
            category_tags: draft.category_tags,
            updated_at: now_iso(),
        };
        let created: Option<ProductRecord> = self
            .db
            .create(PRODUCT_TABLE)
            .content(content)
            .await
            .map_err(write_err)?;
        created
            .map(Into::into)
            .ok_or_else(|| BackendError::WriteFailed("Failed to create product".to_string()))
    }
}

#[async_trait]
impl CatalogBackend for SurrealBackend {
    async fn list_categories(&self) -> BackendResult<Vec<Category>> {
        let categories: Vec<CategoryRecord> = self
            .db
            .query("SELECT * FROM category ORDER BY name")
            .await
            .map_err(read_err)?
            .take(0)
            .map_err(read_err)?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    async fn create_category(&self, draft: CategoryCreate) -> BackendResult<Category> {
        if self.find_category_by_name(&draft.name).await?.is_some() {
            return Err(BackendError::Duplicate(format!(
                "Category '{}' already exists",
                draft.name
            )));
        }

        let content = CategoryContent {
            name: draft.name,
            canonical_tag: draft.canonical_tag,
            color: draft.color.unwrap_or_else(|| "#667eea".to_string()),
            image: draft.image.unwrap_or_default(),
            description: draft.description.unwrap_or_default(),
            is_special: draft.is_special.unwrap_or(false),
            created_at: now_iso(),
        };

        let created: Option<CategoryRecord> = self
            .db
            .create(CATEGORY_TABLE)
            .content(content)
            .await
            .map_err(write_err)?;
        created
            .map(Into::into)
            .ok_or_else(|| BackendError::WriteFailed("Failed to create category".to_string()))
    }

    async fn update_category(&self, id: &str, patch: CategoryUpdate) -> BackendResult<Category> {
        let pure = pure_id(CATEGORY_TABLE, id).to_string();
        let existing = self.find_category_by_id(&pure).await?;
        if existing.is_none() {
            return Err(BackendError::NotFound(format!(
                "Category {} not found",
                id
            )));
        }

        let merge = CategoryMerge {
            name: patch.name,
            canonical_tag: patch.canonical_tag,
            color: patch.color,
            image: patch.image,
            description: patch.description,
            is_special: patch.is_special,
            updated_at: now_iso(),
        };

        let thing = RecordId::from_table_key(CATEGORY_TABLE, pure.as_str());
        self.db
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", merge))
            .await
            .map_err(write_err)?;

        self.find_category_by_id(&pure)
            .await?
            .ok_or_else(|| BackendError::NotFound(format!("Category {} not found", id)))
    }

    async fn delete_category(&self, id: &str) -> BackendResult<()> {
        let pure = pure_id(CATEGORY_TABLE, id);
        let deleted: Option<CategoryRecord> = self
            .db
            .delete((CATEGORY_TABLE, pure))
            .await
            .map_err(write_err)?;
        if deleted.is_none() {
            return Err(BackendError::NotFound(format!(
                "Category {} not found",
                id
            )));
        }
        Ok(())
    }

    async fn list_products(&self) -> BackendResult<Vec<Product>> {
        let products: Vec<ProductRecord> = self
            .db
            .query("SELECT * FROM product ORDER BY name")
            .await
            .map_err(read_err)?
            .take(0)
            .map_err(read_err)?;
        Ok(products.into_iter().map(Into::into).collect())
    }

    async fn update_product_categories(
        &self,
        id: &str,
        tags: Vec<String>,
    ) -> BackendResult<Product> {
        let pure = pure_id(PRODUCT_TABLE, id);
        let thing = RecordId::from_table_key(PRODUCT_TABLE, pure);
        let mut result = self
            .db
            .query("UPDATE $thing SET category_tags = $tags, updated_at = $updated RETURN AFTER")
            .bind(("thing", thing))
            .bind(("tags", tags))
            .bind(("updated", now_iso()))
            .await
            .map_err(write_err)?;
        let products: Vec<ProductRecord> = result.take(0).map_err(write_err)?;
        products
            .into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| BackendError::NotFound(format!("Product {} not found", id)))
    }
}
