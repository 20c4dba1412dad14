//! Catalog Models

pub mod category;
pub mod product;

// Re-exports
pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use product::{Product, ProductCreate};
