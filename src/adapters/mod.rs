//! External system integrations for tableswap.
//!
//! - [`database`] - Trait seams for the relational target and key-value store
//! - [`postgresql`] - PostgreSQL implementations of those traits
//! - [`extract`] - Export artifact producers
//! - [`notify`] - End-of-run notification sinks
//! - [`lifecycle`] - Hosting worker termination
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the sync engine can
//! be exercised with in-memory implementations.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tableswap::adapters::postgresql::{PgStore, PostgreSQLClient};
//! use tableswap::adapters::database::RelationalStore;
//! use tableswap::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tableswap.toml")?;
//! let client = Arc::new(PostgreSQLClient::new(&config.target)?);
//! let store = PgStore::new(client);
//! store.execute("SELECT 1").await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod extract;
pub mod lifecycle;
pub mod notify;
pub mod postgresql;
