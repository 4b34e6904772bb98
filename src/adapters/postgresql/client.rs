//! PostgreSQL client implementation
//!
//! Owns the connection pool for the analytic target.

use crate::config::schema::TargetConfig;
use crate::domain::{Result, SyncError};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::NoTls;

/// PostgreSQL client for tableswap
///
/// Connections are pooled; every checkout applies the configured statement timeout.
pub struct PostgreSQLClient {
    pool: Pool,

    statement_timeout_seconds: u64,

    /// Host/port/database part of the connection string, credentials stripped
    safe_target: String,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// The pool is created lazily, so this succeeds without reaching the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is missing or unparseable, or
    /// if the pool cannot be built.
    pub fn new(config: &TargetConfig) -> Result<Self> {
        let conn_str = config
            .connection_string
            .as_ref()
            .map(|s| s.expose_secret().as_ref().to_string())
            .ok_or_else(|| {
                SyncError::Configuration("target.connection_string is required".to_string())
            })?;

        let pg_config: tokio_postgres::Config = conn_str.parse().map_err(|e| {
            SyncError::Configuration(format!("Invalid PostgreSQL connection string: {}", e))
        })?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let timeout = Duration::from_secs(config.connection_timeout_seconds);
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .build()
            .map_err(|e| SyncError::Database(format!("Failed to create connection pool: {}", e)))?;

        Ok(Self {
            pool,
            statement_timeout_seconds: config.statement_timeout_seconds,
            safe_target: redact_connection_string(&conn_str),
        })
    }

    /// Checks out a connection and runs `SELECT 1`
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Database`] if the server cannot be reached or the
    /// query fails.
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| SyncError::Database(format!("Connection test failed: {}", e)))?;

        tracing::info!(target_db = %self.safe_target, "PostgreSQL connection test successful");
        Ok(())
    }

    /// Get a connection from the pool with the statement timeout applied
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be obtained.
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Object> {
        let client = self.pool.get().await.map_err(|e| {
            SyncError::Database(format!("Failed to get connection from pool: {}", e))
        })?;

        client
            .batch_execute(&format!(
                "SET statement_timeout = {}",
                self.statement_timeout_seconds.saturating_mul(1000)
            ))
            .await
            .map_err(|e| SyncError::Database(format!("Failed to set statement timeout: {}", e)))?;

        Ok(client)
    }

    /// Get the connection string (without credentials)
    pub fn connection_string_safe(&self) -> &str {
        &self.safe_target
    }
}

fn redact_connection_string(conn_str: &str) -> String {
    conn_str
        .rsplit_once('@')
        .map(|(_, target)| format!("postgresql://***@{}", target))
        .unwrap_or_else(|| "postgresql://***".to_string())
}
