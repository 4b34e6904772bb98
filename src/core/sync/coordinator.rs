//! Sync coordinator
//!
//! Drives one run through `INIT → EXPORTING → (EXPORT_FAILED | LOADING) →
//! (LOAD_INCOMPLETE | SWAPPING) → NOTIFYING → DONE`. Every terminal path
//! notifies exactly once and then requests worker termination exactly once.

use crate::adapters::database::RelationalStore;
use crate::adapters::extract::Extractor;
use crate::adapters::lifecycle::WorkerLifecycle;
use crate::adapters::notify::NotificationSink;
use crate::config::SyncConfig;
use crate::core::artifact::read_artifact;
use crate::core::notify::Notifier;
use crate::core::state::DesignationStore;
use crate::core::sync::batch::{BatchLoader, BatchOutcome};
use crate::core::sync::partition::partition;
use crate::core::sync::run::{RunPhase, RunStatus, SyncRun};
use crate::core::view::ViewUpdater;
use crate::domain::{Designation, Result, SourceRow, SqlIdentifier, SyncError, TargetTables};
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Validated settings the coordinator needs from the configuration
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub tables: TargetTables,
    pub view: SqlIdentifier,
    pub batch_size: NonZeroUsize,
    /// Create both target tables when missing
    pub create_tables: bool,
}

impl SyncSettings {
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        Ok(Self {
            tables: config.target_tables().map_err(SyncError::Configuration)?,
            view: config.view_name().map_err(SyncError::Configuration)?,
            batch_size: config.batch_size().map_err(SyncError::Configuration)?,
            create_tables: config.target.create_tables,
        })
    }
}

/// External collaborators of a run
pub struct Collaborators {
    pub extractor: Arc<dyn Extractor>,
    pub store: Arc<dyn RelationalStore>,
    pub designations: DesignationStore,
    pub sink: Arc<dyn NotificationSink>,
    pub lifecycle: Arc<dyn WorkerLifecycle>,
}

/// DDL creating a target table when it is missing
pub fn create_table_statement(table: &SqlIdentifier) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, status_date TIMESTAMP, rating BIGINT)",
        table.quoted()
    )
}

pub fn truncate_statement(table: &SqlIdentifier) -> String {
    format!("TRUNCATE TABLE {}", table.quoted())
}

/// Orchestrates one sync run
pub struct SyncCoordinator {
    settings: SyncSettings,
    collaborators: Collaborators,
}

impl SyncCoordinator {
    pub fn new(settings: SyncSettings, collaborators: Collaborators) -> Self {
        Self {
            settings,
            collaborators,
        }
    }

    /// Executes the run to its terminal state
    ///
    /// Never fails: every error is folded into the returned [`SyncRun`].
    pub async fn run(&self) -> SyncRun {
        let mut run = SyncRun::start();
        tracing::info!(run_id = %run.run_id, started_at = %run.started_at, "Starting sync run");

        run.enter(RunPhase::Exporting);
        let rows = match self.export().await {
            Ok(rows) => rows,
            Err(e) => {
                crate::log_error_with_context!(&e, "Export failed");
                run.enter(RunPhase::ExportFailed);
                run.conclude(RunStatus::ExportFailure, Some(e.to_string()));
                return self.finalize(run).await;
            }
        };

        run.enter(RunPhase::Loading);
        match self.load(&mut run, rows).await {
            Err(e) => {
                crate::log_error_with_context!(&e, "Loading aborted");
                run.conclude(RunStatus::LoadFailure, Some(e.to_string()));
            }
            Ok(inactive) if run.failed_batch_count == 0 => {
                run.enter(RunPhase::Swapping);
                self.promote(&mut run, inactive).await;
            }
            Ok(_) => {
                run.enter(RunPhase::LoadIncomplete);
                tracing::warn!(
                    failed_batch_count = run.failed_batch_count,
                    batch_count = run.batch_count,
                    "Load incomplete, active table left unchanged"
                );
                run.conclude(RunStatus::LoadFailure, None);
            }
        }

        self.finalize(run).await
    }

    /// Produces the artifact and reads all of it
    async fn export(&self) -> Result<Vec<SourceRow>> {
        let artifact = self.collaborators.extractor.extract().await?;
        read_artifact(&artifact.path).await
    }

    /// Truncates the inactive table and loads every batch into it
    ///
    /// Returns the designation that was loaded. Batch failures are counted on
    /// `run`; only structural failures are returned as errors.
    async fn load(&self, run: &mut SyncRun, rows: Vec<SourceRow>) -> Result<Designation> {
        let store = self.collaborators.store.as_ref();

        self.collaborators.designations.prepare().await?;
        let active = self.collaborators.designations.get_active().await?;
        run.previous_active = Some(active);
        let inactive = DesignationStore::inactive_of(active);
        let table = self.settings.tables.table_for(inactive);

        tracing::info!(
            run_id = %run.run_id,
            active = %active,
            inactive = %inactive,
            table = %table,
            rows = rows.len(),
            batch_size = self.settings.batch_size.get(),
            "Loading inactive table"
        );

        if self.settings.create_tables {
            for (_, target) in self.settings.tables.both() {
                store.execute(&create_table_statement(target)).await?;
            }
        }

        store.execute(&truncate_statement(table)).await?;

        let loader = BatchLoader::new(store);
        for (index, batch) in partition(rows, self.settings.batch_size).enumerate() {
            match loader.load(&batch, table).await {
                BatchOutcome::Committed { rows_affected } => {
                    crate::log_batch_outcome!(index, batch.len(), true);
                    run.record_batch(true, rows_affected);
                }
                BatchOutcome::Failed { reason } => {
                    crate::log_batch_outcome!(index, batch.len(), false, reason);
                    run.record_batch(false, 0);
                }
            }
        }

        Ok(inactive)
    }

    /// Flips the designation, then repoints the view
    async fn promote(&self, run: &mut SyncRun, inactive: Designation) {
        let table = self.settings.tables.table_for(inactive);

        if let Err(e) = self.collaborators.designations.set_active(inactive).await {
            crate::log_error_with_context!(&e, "Promotion failed");
            run.conclude(
                RunStatus::LoadFailure,
                Some(format!("Failed to promote {inactive}: {e}")),
            );
            return;
        }
        run.promoted = Some(inactive);
        run.promoted_table = Some(table.to_string());

        let updater = ViewUpdater::new(
            self.collaborators.store.as_ref(),
            self.settings.view.clone(),
        );
        match updater.repoint(table).await {
            Ok(()) => run.conclude(RunStatus::Success, None),
            Err(e) => {
                crate::log_error_with_context!(&e, "View is stale after promotion");
                run.conclude(RunStatus::ViewUpdateFailure, Some(e.to_string()));
            }
        }
    }

    async fn finalize(&self, run: SyncRun) -> SyncRun {
        finish_run(
            run,
            self.collaborators.sink.as_ref(),
            self.collaborators.lifecycle.as_ref(),
        )
        .await
    }
}

/// Ends a run that could not start because configuration failed
pub async fn fail_configuration(
    error: &SyncError,
    sink: &dyn NotificationSink,
    lifecycle: &dyn WorkerLifecycle,
) -> SyncRun {
    let mut run = SyncRun::start();
    crate::log_error_with_context!(error, "Configuration failed");
    run.conclude(RunStatus::ConfigFailure, Some(error.to_string()));
    finish_run(run, sink, lifecycle).await
}

async fn finish_run(
    mut run: SyncRun,
    sink: &dyn NotificationSink,
    lifecycle: &dyn WorkerLifecycle,
) -> SyncRun {
    run.finish();

    run.enter(RunPhase::Notifying);
    Notifier::new(sink).report(&run).await;

    run.enter(RunPhase::Done);
    run.log_summary();
    if let Err(e) = lifecycle.terminate() {
        crate::log_error_with_context!(&e, "Worker termination failed");
    }

    run
}
