//! Catalog reconciliation engine
//!
//! Core of the admin catalog page: resolves the overlapping identifier
//! schemes found in stored product tag lists (backend store ids,
//! canonical tags, display names, one legacy literal), projects
//! membership state for single and multi product selections, and
//! applies bulk category assignments transactionally per product.
//!
//! Persistence is a pluggable async backend ([`backend::CatalogBackend`]);
//! a SurrealDB document backend and an in-memory backend ship here, with
//! a redb snapshot cache for offline category fallback. Rendering,
//! forms, and routing live in the page controller, not in this crate.
//!
//! The engine is an explicitly constructed service owned by that
//! controller. There is no ambient global instance.

pub mod assignment;
pub mod backend;
pub mod identity;
pub mod membership;
pub mod selection;
pub mod snapshot;
pub mod store;

// Re-exports
pub use assignment::{
    AssignmentMode, AssignmentPlan, BulkAssignmentEngine, BulkOutcome, ProductWriteError,
    PruneReport, compute_assignment,
};
pub use backend::{BackendError, BackendResult, CatalogBackend, MemoryBackend, SurrealBackend};
pub use membership::{common_membership, membership_of, orphaned_tags};
pub use selection::SelectionSet;
pub use snapshot::SnapshotStore;
pub use store::{CategoryListing, CategorySource, CategoryStore, ProductStore};
