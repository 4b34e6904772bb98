//! End-of-run notification
//!
//! Composes the single terminal message of a run and hands it to the sink.
//! Delivery failures are logged and never change the run outcome.

use crate::adapters::notify::NotificationSink;
use crate::core::sync::run::{RunStatus, SyncRun};

/// Composes and publishes the terminal message
pub struct Notifier<'a> {
    sink: &'a dyn NotificationSink,
}

impl<'a> Notifier<'a> {
    pub fn new(sink: &'a dyn NotificationSink) -> Self {
        Self { sink }
    }

    /// Publishes the message for `run`; returns whether delivery succeeded
    pub async fn report(&self, run: &SyncRun) -> bool {
        let message = compose_message(run);
        match self.sink.publish(&message).await {
            Ok(()) => {
                tracing::info!(run_id = %run.run_id, "Run notification sent");
                true
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to deliver run notification");
                false
            }
        }
    }
}

/// The terminal message describing `run`
pub fn compose_message(run: &SyncRun) -> String {
    let minutes = format!("{:.2}", run.elapsed_minutes());
    let detail = run
        .failure
        .as_deref()
        .map(|f| format!(" Reason: {f}"))
        .unwrap_or_default();

    match run.status {
        Some(RunStatus::Success) => {
            let designation = run.promoted.map(|d| d.as_str()).unwrap_or("UNKNOWN");
            let table = run.promoted_table.as_deref().unwrap_or("unknown");
            format!(
                "Sync succeeded. Active table is now {designation} ({table}) with {} rows in {} batches. The sync took: {minutes} minutes",
                run.rows_loaded, run.batch_count
            )
        }
        Some(RunStatus::LoadFailure) if run.failed_batch_count > 0 => format!(
            "Sync load incomplete: {} of {} batches failed. Active table unchanged. The sync took: {minutes} minutes",
            run.failed_batch_count, run.batch_count
        ),
        Some(RunStatus::LoadFailure) => format!(
            "Sync failed during loading. Active table unchanged.{detail} The sync took: {minutes} minutes"
        ),
        Some(RunStatus::ExportFailure) => format!(
            "Sync failed at stage EXPORT: the source export could not be produced or read. No data was loaded.{detail}"
        ),
        Some(RunStatus::ConfigFailure) => format!(
            "Sync failed at stage CONFIGURATION: the run could not start.{detail}"
        ),
        Some(RunStatus::ViewUpdateFailure) => {
            let designation = run.promoted.map(|d| d.as_str()).unwrap_or("UNKNOWN");
            format!(
                "Sync loaded and promoted {designation}, but the reporting view could not be updated and is stale.{detail} The sync took: {minutes} minutes"
            )
        }
        None => format!("Sync ended in an unknown state.{detail}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Designation;

    #[test]
    fn test_success_message_names_table_and_minutes() {
        let mut run = SyncRun::start();
        run.record_batch(true, 250);
        run.promoted = Some(Designation::Green);
        run.promoted_table = Some("table_green".to_string());
        run.conclude(RunStatus::Success, None);
        run.finish();

        let message = compose_message(&run);
        assert!(message.contains("GREEN"));
        assert!(message.contains("table_green"));
        assert!(message.contains("The sync took: 0.00 minutes"));
    }

    #[test]
    fn test_load_incomplete_reports_failure_count() {
        let mut run = SyncRun::start();
        run.record_batch(false, 0);
        run.record_batch(true, 5);
        run.conclude(RunStatus::LoadFailure, None);

        assert!(compose_message(&run).contains("1 of 2 batches failed"));
    }

    #[test]
    fn test_failure_stages_are_distinct() {
        let mut export = SyncRun::start();
        export.conclude(RunStatus::ExportFailure, Some("exit 1".to_string()));
        let mut config = SyncRun::start();
        config.conclude(RunStatus::ConfigFailure, None);
        let mut view = SyncRun::start();
        view.promoted = Some(Designation::Blue);
        view.conclude(RunStatus::ViewUpdateFailure, None);

        let export_msg = compose_message(&export);
        assert!(export_msg.contains("stage EXPORT"));
        assert!(export_msg.contains("exit 1"));
        assert!(compose_message(&config).contains("stage CONFIGURATION"));
        assert!(compose_message(&view).contains("view could not be updated"));
        assert_ne!(export_msg, compose_message(&config));
    }
}
