// Tableswap - Blue/green full-refresh table sync into PostgreSQL
// Copyright (c) 2025 Tableswap Contributors
// Licensed under the MIT License

use anyhow::Context;
use std::process;
use std::sync::Arc;
use tableswap::adapters::database::KeyValueStore;
use tableswap::adapters::extract;
use tableswap::adapters::lifecycle::{self, WorkerLifecycle};
use tableswap::adapters::notify::{sink_from_env, NotificationSink, WebhookSink};
use tableswap::adapters::postgresql::{PgKeyValueStore, PgStore, PostgreSQLClient};
use tableswap::config::{load_config, LoggingConfig, SyncConfig};
use tableswap::core::state::DesignationStore;
use tableswap::core::sync::{fail_configuration, Collaborators, SyncCoordinator, SyncSettings};
use tableswap::domain::{SqlIdentifier, SyncError};
use tableswap::logging::init_logging;

/// Environment variable naming the configuration file
const CONFIG_PATH_ENV: &str = "TABLESWAP_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "tableswap.toml";

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let exit_code = run_once().await;
    process::exit(exit_code);
}

/// Runs a single sync and returns the process exit code
///
/// The logging guard lives inside this function so buffered log lines are
/// flushed before the process exits.
async fn run_once() -> i32 {
    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => return bootstrap_failure(&e).await,
    };

    let _guard = match init_logging(&config.application.log_level, &config.logging) {
        Ok(guard) => guard,
        Err(e) => return bootstrap_failure(&e).await,
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path,
        "Tableswap - blue/green table sync"
    );

    let lifecycle: Arc<dyn WorkerLifecycle> =
        Arc::from(lifecycle::from_argv(&config.lifecycle.terminate_command));
    let sink: Arc<dyn NotificationSink> = match WebhookSink::from_config(&config.notification) {
        Ok(sink) => Arc::new(sink),
        Err(e) => {
            let run = fail_configuration(&e, sink_from_env().as_ref(), lifecycle.as_ref()).await;
            return exit_code(&run);
        }
    };

    let run = match build_coordinator(&config, sink.clone(), lifecycle.clone()).await {
        Ok(coordinator) => coordinator.run().await,
        Err(e) => {
            let error = SyncError::Configuration(format!("{e:#}"));
            fail_configuration(&error, sink.as_ref(), lifecycle.as_ref()).await
        }
    };

    exit_code(&run)
}

/// Wires the PostgreSQL-backed collaborators
///
/// The target must answer a connection test; an unreachable target is
/// reported as a configuration failure before anything is exported.
async fn build_coordinator(
    config: &SyncConfig,
    sink: Arc<dyn NotificationSink>,
    lifecycle: Arc<dyn WorkerLifecycle>,
) -> anyhow::Result<SyncCoordinator> {
    let settings = SyncSettings::from_config(config).context("Invalid sync settings")?;
    let client = Arc::new(
        PostgreSQLClient::new(&config.target).context("Failed to create PostgreSQL client")?,
    );
    client
        .test_connection()
        .await
        .with_context(|| format!("Target database {} unreachable", client.connection_string_safe()))?;

    let designation_table = SqlIdentifier::new(config.designation.table.as_str())
        .map_err(anyhow::Error::msg)
        .context("Invalid designation.table")?;
    let kv: Arc<dyn KeyValueStore> =
        Arc::new(PgKeyValueStore::new(client.clone(), designation_table));

    let collaborators = Collaborators {
        extractor: Arc::from(extract::from_config(config)),
        store: Arc::new(PgStore::new(client)),
        designations: DesignationStore::new(kv, config.designation.key.clone()),
        sink,
        lifecycle,
    };

    Ok(SyncCoordinator::new(settings, collaborators))
}

/// Reports a failure that happened before a validated configuration was usable
///
/// Notification and termination fall back to collaborators read straight from
/// the environment.
async fn bootstrap_failure(error: &SyncError) -> i32 {
    if init_logging("info", &LoggingConfig::console_only()).is_err() {
        eprintln!("Error: {error}");
    }

    let sink = sink_from_env();
    let lifecycle = lifecycle::from_env();
    let run = fail_configuration(error, sink.as_ref(), lifecycle.as_ref()).await;
    exit_code(&run)
}

fn exit_code(run: &tableswap::core::sync::SyncRun) -> i32 {
    run.status.map(|status| status.exit_code()).unwrap_or(1)
}
