//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub image: String,
    /// Price in cents
    pub price: Option<i64>,
    /// Free-form category tag list. Each entry is expected to be some
    /// category's canonical tag, store id, or display name, but the
    /// data source enforces neither uniqueness nor referential
    /// integrity: duplicates and orphaned tags from deleted or renamed
    /// categories both occur.
    #[serde(default)]
    pub category_tags: Vec<String>,
    pub updated_at: Option<String>,
}

/// Create product payload (admin-side seeding; the reconciliation core
/// itself only ever rewrites `category_tags`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub image: Option<String>,
    pub price: Option<i64>,
    #[serde(default)]
    pub category_tags: Vec<String>,
}
