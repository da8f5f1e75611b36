//! Referential-integrity and association-lifecycle layer.
//!
//! [`CommandService`] is the single entry point for every query and
//! mutation. Each mutating method follows the same shape: role check,
//! validation of every referenced foreign id, an atomic storage scope for
//! the writes, association updates where the entity carries links, commit,
//! and a re-fetch of the resulting entity. A failure at any step before
//! commit rolls the whole mutation back.

use std::sync::Arc;

use commandpost_storage::CommandStore;

pub mod access;
pub mod error;
pub mod links;
pub mod validate;

mod ambulances;
mod collection_points;
mod events;
mod hospitals;
mod patients;
mod users;

pub use access::{RoleGate, StaticGate, acl};
pub use error::{ErrorCategory, ServiceError};
pub use events::EventUpdate;
pub use links::Links;

/// Orchestrates validation, storage writes and association updates for the
/// whole API surface.
pub struct CommandService {
    store: Arc<dyn CommandStore>,
    gate: Arc<dyn RoleGate>,
}

impl CommandService {
    /// Creates a service over the given store with the static role gate.
    #[must_use]
    pub fn new(store: Arc<dyn CommandStore>) -> Self {
        Self::with_gate(store, Arc::new(StaticGate))
    }

    /// Creates a service with a custom role gate.
    #[must_use]
    pub fn with_gate(store: Arc<dyn CommandStore>, gate: Arc<dyn RoleGate>) -> Self {
        Self { store, gate }
    }

    pub(crate) fn store(&self) -> &dyn CommandStore {
        self.store.as_ref()
    }

    pub(crate) fn gate(&self) -> &dyn RoleGate {
        self.gate.as_ref()
    }
}
