//! Working-set stores
//!
//! Each store owns its collection exclusively for the page session and
//! delegates persistence to the pluggable backend. The backend stays
//! the source of truth: mutations are followed by a full refresh rather
//! than optimistic local edits.

pub mod category;
pub mod product;

// Re-exports
pub use category::{CategoryListing, CategorySource, CategoryStore, default_categories};
pub use product::ProductStore;
