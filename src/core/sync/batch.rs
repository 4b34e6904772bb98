//! Batch loader
//!
//! Loads one batch of source rows into a target table inside a single
//! transaction. Failures are reported as a [`BatchOutcome`] rather than an
//! error: a failed batch never stops the run.

use crate::adapters::database::RelationalStore;
use crate::domain::record::COLUMNS_PER_RECORD;
use crate::domain::{Record, Result, SourceRow, SqlIdentifier, SqlValue, SyncError};
use std::fmt::Write as _;

/// Result of loading one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Committed { rows_affected: u64 },
    Failed { reason: String },
}

/// Builds `INSERT INTO "<table>" (id, status_date, rating) VALUES ($1, $2, $3), ...`
pub fn insert_statement(table: &SqlIdentifier, row_count: usize) -> String {
    let mut sql = format!(
        "INSERT INTO {} (id, status_date, rating) VALUES ",
        table.quoted()
    );
    for row in 0..row_count {
        if row > 0 {
            sql.push_str(", ");
        }
        let base = row * COLUMNS_PER_RECORD;
        let _ = write!(sql, "(${}, ${}, ${})", base + 1, base + 2, base + 3);
    }
    sql
}

/// Binds every row of a batch, stopping at the first unbindable one
pub fn bind_batch(rows: &[SourceRow]) -> Result<Vec<Vec<SqlValue>>> {
    rows.iter()
        .map(|row| {
            Record::try_from(row)
                .map(|record| record.to_params().to_vec())
                .map_err(SyncError::from)
        })
        .collect()
}

/// Loads batches into a target table
pub struct BatchLoader<'a> {
    store: &'a dyn RelationalStore,
}

impl<'a> BatchLoader<'a> {
    pub fn new(store: &'a dyn RelationalStore) -> Self {
        Self { store }
    }

    /// Loads `rows` into `table` as one transaction
    ///
    /// Rows are bound before the transaction is opened. Begin, insert and commit
    /// failures roll back and yield [`BatchOutcome::Failed`]; a rollback failure is
    /// only logged.
    pub async fn load(&self, rows: &[SourceRow], table: &SqlIdentifier) -> BatchOutcome {
        if rows.is_empty() {
            return BatchOutcome::Committed { rows_affected: 0 };
        }

        let params = match bind_batch(rows) {
            Ok(params) => params,
            Err(e) => {
                return BatchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        let mut tx = match self.store.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                return BatchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        let sql = insert_statement(table, rows.len());
        let rows_affected = match tx.execute_batch(&sql, &params).await {
            Ok(n) => n,
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(
                        table = %table,
                        error = %rollback_err,
                        "Rollback failed"
                    );
                }
                return BatchOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        match tx.commit().await {
            Ok(()) => BatchOutcome::Committed { rows_affected },
            Err(e) => BatchOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }
}
