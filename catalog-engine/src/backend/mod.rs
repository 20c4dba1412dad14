//! Persistence backends
//!
//! The reconciliation core treats persistence as a pluggable async
//! collaborator: every operation eventually resolves or rejects, and no
//! retry, pagination, or protocol semantics are assumed beyond that.

pub mod memory;
pub mod surreal;

// Re-exports
pub use memory::MemoryBackend;
pub use surreal::SurrealBackend;

use async_trait::async_trait;
use shared::error::CatalogError;
use shared::models::{Category, CategoryCreate, CategoryUpdate, Product};
use thiserror::Error;

/// Backend error types
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

impl From<BackendError> for CatalogError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unavailable(msg) => CatalogError::BackendUnavailable(msg),
            BackendError::WriteFailed(msg) => CatalogError::BackendUnavailable(msg),
            BackendError::NotFound(msg) => CatalogError::NotFound(msg),
            BackendError::Duplicate(msg) => CatalogError::Duplicate(msg),
        }
    }
}

/// Document-store collaborator for categories and products.
///
/// `create_category` is the source of truth for store-id generation, so
/// callers refresh with a full list after any mutation instead of
/// trusting optimistic local state.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    async fn list_categories(&self) -> BackendResult<Vec<Category>>;
    async fn create_category(&self, draft: CategoryCreate) -> BackendResult<Category>;
    async fn update_category(&self, id: &str, patch: CategoryUpdate) -> BackendResult<Category>;
    async fn delete_category(&self, id: &str) -> BackendResult<()>;
    async fn list_products(&self) -> BackendResult<Vec<Product>>;
    async fn update_product_categories(&self, id: &str, tags: Vec<String>)
    -> BackendResult<Product>;
}
