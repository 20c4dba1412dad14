//! redb-based snapshot cache for the category working set
//!
//! The admin page loads its working set once per session from the
//! document backend. When the backend is unreachable on a later load,
//! the last successfully listed category set is served from this local
//! cache instead of silently showing an empty catalog.
//!
//! Single table, single key: the snapshot is small (one admin catalog)
//! and always replaced wholesale.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, TableError};
use shared::models::Category;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for the category snapshot: key = snapshot name, value = JSON
const SNAPSHOT_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("catalog_snapshot");

const CATEGORIES_KEY: &str = "categories";

/// Snapshot storage errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Last-known-catalog cache backed by redb
#[derive(Clone)]
pub struct SnapshotStore {
    db: Arc<Database>,
}

impl SnapshotStore {
    /// Open or create the snapshot database at the given path.
    pub fn open(path: impl AsRef<Path>) -> SnapshotResult<Self> {
        let db = Database::create(path)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Replace the stored category snapshot.
    pub fn save_categories(&self, categories: &[Category]) -> SnapshotResult<()> {
        let encoded = serde_json::to_vec(categories)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SNAPSHOT_TABLE)?;
            table.insert(CATEGORIES_KEY, encoded.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Load the last stored category snapshot, if any.
    pub fn load_categories(&self) -> SnapshotResult<Option<Vec<Category>>> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(SNAPSHOT_TABLE) {
            Ok(table) => table,
            // First run: nothing has been saved yet
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match table.get(CATEGORIES_KEY)? {
            Some(guard) => {
                let categories: Vec<Category> = serde_json::from_slice(guard.value())?;
                Ok(Some(categories))
            }
            None => Ok(None),
        }
    }
}
