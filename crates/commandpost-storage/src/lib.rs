//! Storage abstraction layer for the commandpost backend.
//!
//! Defines the contract every storage backend must implement: per-entity
//! repositories with soft-delete semantics, the [`CommandStore`] bundle the
//! service layer works against, and the [`AtomicScope`] transaction handle
//! that lets a multi-step mutation roll back as one unit.

pub mod error;
pub mod record;
pub mod traits;
pub mod types;

pub use error::StorageError;
pub use record::{Junction, Record, RecordId};
pub use traits::{AtomicScope, CommandStore, Repository};
pub use types::{IdFilter, LinkFilter, PatientFilter, Visibility};
