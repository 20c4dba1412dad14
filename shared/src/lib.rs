//! Shared types for the catalog reconciliation engine
//!
//! Common types used across the workspace: catalog models, the error
//! taxonomy, and id/time utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{CatalogError, CatalogResult};
pub use models::{Category, CategoryCreate, CategoryUpdate, Product, ProductCreate};
pub use serde::{Deserialize, Serialize};
