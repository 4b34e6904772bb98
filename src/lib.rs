// Tableswap - Blue/green full-refresh table sync into PostgreSQL
// Copyright (c) 2025 Tableswap Contributors
// Licensed under the MIT License

//! # Tableswap - blue/green full-refresh table sync
//!
//! Tableswap copies a complete dataset from a source database export into one of
//! two PostgreSQL tables and only exposes it to readers once every row is in.
//!
//! ## Overview
//!
//! Each run:
//! - **Exports** the source rows into a CSV artifact through an external command
//! - **Loads** them into the inactive ("blue" or "green") table in transactional batches
//! - **Promotes** that table, if no batch failed, by flipping the active designation
//!   and repointing a reporting view
//! - **Reports** the outcome with exactly one notification, then stops the worker
//!
//! ## Architecture
//!
//! - [`core`] - Sync engine (partitioning, batch loading, promotion, reporting)
//! - [`adapters`] - External integrations (PostgreSQL, export command, webhook, lifecycle)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Promotion Gate
//!
//! Readers never see a partial load: the active table only changes when the run
//! recorded zero failed batches.
//!
//! ```rust
//! use tableswap::core::sync::SyncRun;
//!
//! let mut run = SyncRun::start();
//! run.record_batch(true, 250);
//! run.record_batch(false, 0);
//! assert_eq!(run.failed_batch_count, 1); // this run will not promote
//! ```
//!
//! ## Error Handling
//!
//! All library errors are [`domain::SyncError`]:
//!
//! ```rust,no_run
//! use tableswap::domain::SyncError;
//!
//! fn example() -> Result<(), SyncError> {
//!     let config = tableswap::config::load_config("tableswap.toml")?;
//!     println!("{}", config.target.view_name);
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Tableswap logs through `tracing` with structured fields:
//!
//! ```rust,no_run
//! tracing::info!(run_id = "8d7c", table = "table_green", "Loading inactive table");
//! ```

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
