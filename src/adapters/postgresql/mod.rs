//! PostgreSQL database integration
//!
//! Hosts the blue/green target tables, the reporting view and the designation
//! key-value table.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::{PgKeyValueStore, PgStore, PgTransaction};
pub use client::PostgreSQLClient;
