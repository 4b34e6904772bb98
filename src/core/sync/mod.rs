//! Sync engine
//!
//! - [`partition`] - Batch partitioner
//! - [`batch`] - Transactional batch loader
//! - [`run`] - Run state and counters
//! - [`coordinator`] - The run state machine

pub mod batch;
pub mod coordinator;
pub mod partition;
pub mod run;

pub use batch::{BatchLoader, BatchOutcome};
pub use coordinator::{fail_configuration, Collaborators, SyncCoordinator, SyncSettings};
pub use partition::{batch_count, partition, Batches};
pub use run::{RunPhase, RunStatus, SyncRun};
