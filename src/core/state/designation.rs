//! Designation store
//!
//! Persists which target table is active under a single key of a
//! [`KeyValueStore`].

use crate::adapters::database::traits::KeyValueStore;
use crate::domain::{Designation, Result, SyncError};
use std::sync::Arc;

/// Active-designation persistence
pub struct DesignationStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl DesignationStore {
    /// Create a store reading and writing `key`
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Makes sure the backing store can be read and written
    pub async fn prepare(&self) -> Result<()> {
        self.storage.ensure_ready().await
    }

    /// Reads the persisted designation
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Designation`] when the store cannot be read or holds
    /// a value that is not a designation.
    pub async fn lookup_active(&self) -> Result<Option<Designation>> {
        match self.storage.get(&self.key).await? {
            None => Ok(None),
            Some(raw) => raw.parse::<Designation>().map(Some).map_err(|e| {
                SyncError::Designation(format!("Stored value for '{}': {}", self.key, e))
            }),
        }
    }

    /// Active designation, BLUE when nothing was stored yet
    pub async fn get_active(&self) -> Result<Designation> {
        let active = self.lookup_active().await?;
        if active.is_none() {
            tracing::info!(key = %self.key, "No active designation stored, defaulting to BLUE");
        }
        Ok(active.unwrap_or_default())
    }

    /// Overwrites the active designation
    pub async fn set_active(&self, designation: Designation) -> Result<()> {
        self.storage.set(&self.key, designation.as_str()).await?;
        tracing::info!(key = %self.key, active = %designation, "Active designation updated");
        Ok(())
    }

    /// The other designation
    pub fn inactive_of(designation: Designation) -> Designation {
        designation.toggle()
    }
}
