//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Console output for operators
//! - JSON lines in a rotating local file
//! - Level from configuration, overridable with `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use tableswap::logging::init_logging;
//! use tableswap::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Sync starting");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a run phase transition
///
/// # Example
///
/// ```no_run
/// use tableswap::log_phase;
///
/// let run_id = "8d7c";
/// log_phase!(run_id, "LOADING");
/// ```
#[macro_export]
macro_rules! log_phase {
    ($run_id:expr, $phase:expr) => {
        tracing::info!(
            run_id = %$run_id,
            phase = %$phase,
            "Entering phase"
        );
    };
}

/// Log the outcome of one batch
///
/// # Example
///
/// ```no_run
/// use tableswap::log_batch_outcome;
///
/// log_batch_outcome!(3, 250, true);
/// ```
#[macro_export]
macro_rules! log_batch_outcome {
    ($index:expr, $size:expr, true) => {
        tracing::debug!(batch = $index, size = $size, "Batch committed");
    };
    ($index:expr, $size:expr, false, $reason:expr) => {
        tracing::error!(
            batch = $index,
            size = $size,
            reason = %$reason,
            "Batch failed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use tableswap::log_error_with_context;
/// use tableswap::domain::SyncError;
///
/// let error = SyncError::Export("exit status 1".to_string());
/// log_error_with_context!(&error, "Extraction failed");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
