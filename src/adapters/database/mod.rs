//! Database abstraction layer
//!
//! Trait seams for the relational target and the key-value designation store.
//! PostgreSQL implementations live in [`crate::adapters::postgresql`].

pub mod traits;

pub use traits::{KeyValueStore, RelationalStore, StoreTransaction};
