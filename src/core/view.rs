//! Reporting view maintenance
//!
//! Readers query a single view; promotion repoints it at the newly active table
//! by dropping and recreating it. Between the two statements the view does not
//! exist.

use crate::adapters::database::RelationalStore;
use crate::domain::{Result, SqlIdentifier, SyncError};

/// Repoints the reporting view
pub struct ViewUpdater<'a> {
    store: &'a dyn RelationalStore,
    view: SqlIdentifier,
}

impl<'a> ViewUpdater<'a> {
    pub fn new(store: &'a dyn RelationalStore, view: SqlIdentifier) -> Self {
        Self { store, view }
    }

    pub fn drop_statement(&self) -> String {
        format!("DROP VIEW IF EXISTS {}", self.view.quoted())
    }

    pub fn create_statement(&self, table: &SqlIdentifier) -> String {
        format!(
            "CREATE VIEW {} AS SELECT id AS \"ID\", status_date AS \"Date\", \
             CAST(rating AS double precision) AS \"Rating\" FROM {}",
            self.view.quoted(),
            table.quoted()
        )
    }

    /// Drops the view and recreates it over `table`
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ViewUpdate`] if either statement fails.
    pub async fn repoint(&self, table: &SqlIdentifier) -> Result<()> {
        self.store
            .execute(&self.drop_statement())
            .await
            .map_err(|e| SyncError::ViewUpdate(format!("Failed to drop view {}: {}", self.view, e)))?;

        self.store
            .execute(&self.create_statement(table))
            .await
            .map_err(|e| {
                SyncError::ViewUpdate(format!(
                    "Failed to create view {} over {}: {}",
                    self.view, table, e
                ))
            })?;

        tracing::info!(view = %self.view, table = %table, "View repointed");
        Ok(())
    }
}
