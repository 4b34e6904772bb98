//! PostgreSQL adapter implementing database traits
//!
//! [`PgStore`] implements [`RelationalStore`] for the analytic target and
//! [`PgKeyValueStore`] implements [`KeyValueStore`] on a small upsert table.

use crate::adapters::database::traits::{KeyValueStore, RelationalStore, StoreTransaction};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{flatten_params, key_value_table_ddl};
use crate::domain::{Result, SqlIdentifier, SqlValue, SyncError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// PostgreSQL implementation of [`RelationalStore`]
pub struct PgStore {
    client: Arc<PostgreSQLClient>,
}

impl PgStore {
    pub fn new(client: Arc<PostgreSQLClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RelationalStore for PgStore {
    async fn execute(&self, sql: &str) -> Result<u64> {
        let conn = self.client.get_connection().await?;
        conn.execute(sql, &[])
            .await
            .map_err(|e| SyncError::Database(format!("Statement execution failed: {}", e)))
    }

    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(|e| SyncError::BatchTransaction(e.to_string()))?;

        conn.batch_execute("BEGIN")
            .await
            .map_err(|e| SyncError::BatchTransaction(format!("Failed to begin transaction: {}", e)))?;

        Ok(Box::new(PgTransaction { conn: Some(conn) }))
    }
}

/// A transaction pinned to one pooled connection
///
/// The connection goes back to the pool only after COMMIT or ROLLBACK. If the
/// transaction is dropped unfinished, the connection is detached from the pool
/// and closed, which makes the server discard the open transaction.
pub struct PgTransaction {
    conn: Option<deadpool_postgres::Object>,
}

impl PgTransaction {
    fn conn(&self) -> Result<&deadpool_postgres::Object> {
        self.conn
            .as_ref()
            .ok_or_else(|| SyncError::BatchTransaction("Transaction already finished".to_string()))
    }

    async fn finish(mut self: Box<Self>, statement: &str) -> Result<()> {
        let conn = self
            .conn
            .take()
            .ok_or_else(|| SyncError::BatchTransaction("Transaction already finished".to_string()))?;

        match conn.batch_execute(statement).await {
            Ok(()) => Ok(()),
            Err(e) => {
                // Connection state is unknown, keep it out of the pool.
                let _ = deadpool_postgres::Object::take(conn);
                Err(SyncError::BatchTransaction(format!("{} failed: {}", statement, e)))
            }
        }
    }
}

#[async_trait]
impl StoreTransaction for PgTransaction {
    async fn execute_batch(&mut self, sql: &str, rows: &[Vec<SqlValue>]) -> Result<u64> {
        let owned = flatten_params(rows);
        let params: Vec<&(dyn ToSql + Sync)> = owned
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect();

        self.conn()?
            .execute(sql, &params)
            .await
            .map_err(|e| SyncError::BatchTransaction(format!("Batch insert failed: {}", e)))
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.finish("COMMIT").await
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.finish("ROLLBACK").await
    }
}

impl Drop for PgTransaction {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            tracing::warn!("Dropping unfinished transaction, discarding its connection");
            let _ = deadpool_postgres::Object::take(conn);
        }
    }
}

/// PostgreSQL implementation of [`KeyValueStore`]
///
/// Items live in a two-column table keyed by `item_key`.
pub struct PgKeyValueStore {
    client: Arc<PostgreSQLClient>,
    table: SqlIdentifier,
}

impl PgKeyValueStore {
    pub fn new(client: Arc<PostgreSQLClient>, table: SqlIdentifier) -> Self {
        Self { client, table }
    }

    /// Creates the backing table if it does not exist
    pub async fn ensure_table(&self) -> Result<()> {
        let conn = self.client.get_connection().await?;
        conn.batch_execute(&key_value_table_ddl(&self.table))
            .await
            .map_err(|e| {
                SyncError::Designation(format!(
                    "Failed to create table {}: {}",
                    self.table, e
                ))
            })?;

        tracing::debug!(table = %self.table, "Key-value table ready");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for PgKeyValueStore {
    async fn ensure_ready(&self) -> Result<()> {
        self.ensure_table().await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(|e| SyncError::Designation(e.to_string()))?;

        let query = format!(
            "SELECT item_value FROM {} WHERE item_key = $1",
            self.table.quoted()
        );
        let row = conn
            .query_opt(&query, &[&key])
            .await
            .map_err(|e| SyncError::Designation(format!("Failed to read '{}': {}", key, e)))?;

        Ok(row.map(|r| r.get::<_, String>(0)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(|e| SyncError::Designation(e.to_string()))?;

        let upsert = format!(
            "INSERT INTO {} (item_key, item_value, updated_at) VALUES ($1, $2, now()) \
             ON CONFLICT (item_key) DO UPDATE SET \
                item_value = EXCLUDED.item_value, \
                updated_at = EXCLUDED.updated_at",
            self.table.quoted()
        );
        conn.execute(&upsert, &[&key, &value])
            .await
            .map_err(|e| SyncError::Designation(format!("Failed to write '{}': {}", key, e)))?;

        Ok(())
    }
}
