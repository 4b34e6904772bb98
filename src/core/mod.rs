//! Core business logic for tableswap.
//!
//! # Modules
//!
//! - [`artifact`] - Export artifact reader
//! - [`sync`] - Partitioning, batch loading and run orchestration
//! - [`state`] - Active designation persistence
//! - [`view`] - Reporting view maintenance
//! - [`notify`] - Terminal run message
//!
//! # Sync Workflow
//!
//! 1. **Export**: Produce the artifact and read all of it
//! 2. **Resolve**: Look up the active designation, target the other table
//! 3. **Truncate**: Empty the inactive table
//! 4. **Load**: Insert the rows batch by batch, one transaction each
//! 5. **Promote**: Only if no batch failed, flip the designation and repoint the view
//! 6. **Report**: Send one notification, then terminate the worker
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tableswap::adapters::{extract, lifecycle};
//! use tableswap::adapters::notify::WebhookSink;
//! use tableswap::adapters::postgresql::{PgKeyValueStore, PgStore, PostgreSQLClient};
//! use tableswap::config::load_config;
//! use tableswap::core::state::DesignationStore;
//! use tableswap::core::sync::{Collaborators, SyncCoordinator, SyncSettings};
//! use tableswap::domain::SqlIdentifier;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tableswap.toml")?;
//! let client = Arc::new(PostgreSQLClient::new(&config.target)?);
//! let kv = PgKeyValueStore::new(client.clone(), SqlIdentifier::new(config.designation.table.as_str())?);
//!
//! let collaborators = Collaborators {
//!     extractor: Arc::from(extract::from_config(&config)),
//!     store: Arc::new(PgStore::new(client)),
//!     designations: DesignationStore::new(Arc::new(kv), config.designation.key.clone()),
//!     sink: Arc::new(WebhookSink::from_config(&config.notification)?),
//!     lifecycle: Arc::from(lifecycle::from_argv(&config.lifecycle.terminate_command)),
//! };
//!
//! let run = SyncCoordinator::new(SyncSettings::from_config(&config)?, collaborators)
//!     .run()
//!     .await;
//! println!("Batches: {}, failed: {}", run.batch_count, run.failed_batch_count);
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod notify;
pub mod state;
pub mod sync;
pub mod view;
