//! Domain models and types for tableswap.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`RecordId`], [`SqlIdentifier`])
//! - **Record model** ([`SourceRow`], [`Record`], [`SqlValue`])
//! - **Blue/green designation** ([`Designation`], [`TargetTables`])
//! - **Error types** ([`SyncError`], [`RowBindingError`])
//! - **Result type alias** ([`Result`])
//!
//! # Binding
//!
//! ```rust
//! use tableswap::domain::{Record, SourceRow};
//!
//! let row = SourceRow::new("A-1", "2024-03-01 12:00:00", "");
//! let record = Record::try_from(&row).unwrap();
//! assert_eq!(record.rating, None);
//!
//! let bad = SourceRow::new("A-2", "2024-03-01 12:00:00", "x1");
//! assert!(Record::try_from(&bad).is_err());
//! ```
//!
//! # Designations
//!
//! ```rust
//! use tableswap::domain::Designation;
//!
//! let active = Designation::default();
//! assert_eq!(active, Designation::Blue);
//! assert_eq!(active.toggle(), Designation::Green);
//! ```

pub mod designation;
pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

pub use designation::{Designation, TargetTables};
pub use errors::{RowBindingError, SyncError};
pub use ids::{RecordId, SqlIdentifier};
pub use record::{Record, SourceRow, SqlValue};
pub use result::Result;
