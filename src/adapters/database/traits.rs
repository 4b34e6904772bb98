//! Database abstraction traits
//!
//! The sync engine talks to the analytic target and the designation store only
//! through these traits, so the core can run against in-memory doubles.

use crate::domain::{Result, SqlValue};
use async_trait::async_trait;

/// Relational target store
#[async_trait]
pub trait RelationalStore: Send + Sync {
    /// Executes one non-parameterized statement in its own implicit transaction
    ///
    /// Returns the number of affected rows where the driver reports one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::SyncError::Database`] when the statement fails.
    async fn execute(&self, sql: &str) -> Result<u64>;

    /// Opens an explicit transaction on a dedicated connection
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>>;
}

/// An open transaction returned by [`RelationalStore::begin`]
///
/// Dropping an unfinished transaction must not leave it open on a pooled
/// connection.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Executes `sql` once with every row's values flattened into its parameters
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::SyncError::BatchTransaction`] when execution fails.
    async fn execute_batch(&mut self, sql: &str, rows: &[Vec<SqlValue>]) -> Result<u64>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// String key-value store holding small pieces of run state
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Prepares backing storage, e.g. creates a missing table
    async fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    /// Reads a value, `None` when the key was never written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Creates or replaces a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
