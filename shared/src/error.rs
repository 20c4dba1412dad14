//! Error taxonomy for the catalog reconciliation engine
//!
//! Everything here is recoverable from the operator's point of view: a
//! failed batch item is retried by submitting a new request, and an
//! unreachable backend degrades to the last known snapshot. Nothing in
//! this crate aborts the process.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// Persistence layer unreachable; callers fall back to the last
    /// known snapshot (categories only get built-in defaults as a last
    /// resort).
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A specific product write failed. Local state is left unchanged
    /// and sibling writes in the same batch are unaffected.
    #[error("Persistence failed for product {product_id}: {reason}")]
    PersistenceFailed { product_id: String, reason: String },

    /// Bulk operation invoked with no checked/unchecked deltas.
    /// Rejected before any write is issued.
    #[error("No change requested")]
    NoChangeRequested,

    /// A bulk operation is already applying; a new one must wait for
    /// the in-flight batch to finish.
    #[error("A bulk operation is already in progress")]
    BatchInProgress,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
