//! Domain error types
//!
//! This module defines the error hierarchy for tableswap. Errors are domain-specific
//! and don't expose third-party types; driver errors are flattened into messages at
//! the adapter boundary.

use thiserror::Error;

/// Main tableswap error type
///
/// Structural variants (`Configuration`, `Export`, `Database`, `Designation`) abort a run.
/// `RowBinding` and `BatchTransaction` are absorbed per batch by the loader, and
/// `ViewUpdate` is reported after a promotion has already happened.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration could not be resolved or failed validation
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The extraction collaborator failed or produced a malformed artifact
    #[error("Export error: {0}")]
    Export(String),

    /// A source row could not be coerced into a record
    #[error("Row binding error: {0}")]
    RowBinding(#[from] RowBindingError),

    /// A batch transaction failed to begin, execute, or commit
    #[error("Batch transaction error: {0}")]
    BatchTransaction(String),

    /// The reporting view could not be dropped or recreated
    #[error("View update error: {0}")]
    ViewUpdate(String),

    /// Database connectivity or statement errors
    #[error("Database error: {0}")]
    Database(String),

    /// The designation store could not be read or written
    #[error("Designation store error: {0}")]
    Designation(String),

    /// The notification sink rejected a message
    #[error("Notification error: {0}")]
    Notification(String),

    /// The compute-lifecycle collaborator could not be invoked
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Reasons a single source row cannot be bound to the insert statement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowBindingError {
    /// The ID column was empty
    #[error("record ID cannot be empty")]
    EmptyId,

    /// The RATING column held something other than an integer
    #[error("record {id}: rating '{value}' is not an integer")]
    InvalidRating { id: String, value: String },

    /// The STATUS_DATE column could not be parsed as a timestamp
    #[error("record {id}: status date '{value}' is not a timestamp")]
    InvalidStatusDate { id: String, value: String },
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::Configuration(format!("TOML parse error: {err}"))
    }
}

// csv is only used by the artifact reader.
impl From<csv::Error> for SyncError {
    fn from(err: csv::Error) -> Self {
        SyncError::Export(format!("Malformed export artifact: {err}"))
    }
}
