//! Run bookkeeping
//!
//! A [`SyncRun`] is created when a run starts, mutated only by the coordinator
//! and returned once the run is done. Nothing about it is persisted.

use crate::domain::Designation;
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// States of the sync state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Exporting,
    ExportFailed,
    Loading,
    LoadIncomplete,
    Swapping,
    Notifying,
    Done,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Init => "INIT",
            RunPhase::Exporting => "EXPORTING",
            RunPhase::ExportFailed => "EXPORT_FAILED",
            RunPhase::Loading => "LOADING",
            RunPhase::LoadIncomplete => "LOAD_INCOMPLETE",
            RunPhase::Swapping => "SWAPPING",
            RunPhase::Notifying => "NOTIFYING",
            RunPhase::Done => "DONE",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    LoadFailure,
    ExportFailure,
    ConfigFailure,
    /// Promotion happened but the view could not be recreated
    ViewUpdateFailure,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Success => "SUCCESS",
            RunStatus::LoadFailure => "LOAD_FAILURE",
            RunStatus::ExportFailure => "EXPORT_FAILURE",
            RunStatus::ConfigFailure => "CONFIG_FAILURE",
            RunStatus::ViewUpdateFailure => "VIEW_UPDATE_FAILURE",
        }
    }

    /// Process exit code for the binary
    pub fn exit_code(&self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::LoadFailure => 1,
            RunStatus::ConfigFailure => 2,
            RunStatus::ExportFailure => 3,
            RunStatus::ViewUpdateFailure => 4,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one sync run
#[derive(Debug, Clone)]
pub struct SyncRun {
    pub run_id: Uuid,

    /// Wall-clock start, for reporting
    pub started_at: DateTime<Utc>,

    /// Monotonic start, for elapsed time
    started: Instant,

    pub batch_count: usize,
    pub failed_batch_count: usize,
    pub rows_loaded: u64,

    /// `None` until the run reaches a terminal state
    pub status: Option<RunStatus>,

    /// Active designation when loading started
    pub previous_active: Option<Designation>,

    /// Designation promoted by this run, if any
    pub promoted: Option<Designation>,

    /// Table name the promotion pointed the view at
    pub promoted_table: Option<String>,

    /// Description of the failure that ended the run
    pub failure: Option<String>,

    /// Set when the run is finished
    pub elapsed: Option<Duration>,

    /// Phases visited, in order
    pub phases: Vec<RunPhase>,
}

impl SyncRun {
    /// Starts a new run in [`RunPhase::Init`]
    pub fn start() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            started: Instant::now(),
            batch_count: 0,
            failed_batch_count: 0,
            rows_loaded: 0,
            status: None,
            previous_active: None,
            promoted: None,
            promoted_table: None,
            failure: None,
            elapsed: None,
            phases: vec![RunPhase::Init],
        }
    }

    /// Moves to `phase`
    pub fn enter(&mut self, phase: RunPhase) {
        crate::log_phase!(self.run_id, phase);
        self.phases.push(phase);
    }

    pub fn phase(&self) -> RunPhase {
        self.phases.last().copied().unwrap_or(RunPhase::Init)
    }

    /// Records one batch outcome
    pub fn record_batch(&mut self, committed: bool, rows_affected: u64) {
        self.batch_count += 1;
        if committed {
            self.rows_loaded += rows_affected;
        } else {
            self.failed_batch_count += 1;
        }
    }

    /// Fixes the terminal status; the first failure detail wins
    pub fn conclude(&mut self, status: RunStatus, failure: Option<String>) {
        self.status = Some(status);
        if self.failure.is_none() {
            self.failure = failure;
        }
    }

    /// Stops the clock
    pub fn finish(&mut self) {
        self.elapsed = Some(self.started.elapsed());
    }

    /// Elapsed time, live until [`SyncRun::finish`] is called
    pub fn elapsed(&self) -> Duration {
        self.elapsed.unwrap_or_else(|| self.started.elapsed())
    }

    /// Elapsed minutes rounded to two decimals
    pub fn elapsed_minutes(&self) -> f64 {
        round_minutes(self.elapsed())
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(RunStatus::Success)
    }

    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            status = %self.status.map(|s| s.as_str()).unwrap_or("UNKNOWN"),
            batch_count = self.batch_count,
            failed_batch_count = self.failed_batch_count,
            rows_loaded = self.rows_loaded,
            elapsed_minutes = self.elapsed_minutes(),
            "Sync run finished"
        );

        if let Some(failure) = &self.failure {
            tracing::warn!(run_id = %self.run_id, failure = %failure, "Run failure detail");
        }
    }
}

fn round_minutes(duration: Duration) -> f64 {
    (duration.as_secs_f64() / 60.0 * 100.0).round() / 100.0
}
