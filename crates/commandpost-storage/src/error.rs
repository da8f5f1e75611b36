//! Storage error types.

use commandpost_core::EntityKind;

/// Errors that can occur inside a storage backend.
///
/// Missing rows are not errors at this layer: lookups return `Option` and
/// bulk operations return affected counts. These variants cover
/// infrastructure failures only.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A row with the same id already exists.
    #[error("{kind} {id} already exists")]
    Conflict {
        /// The table the conflicting row belongs to.
        kind: EntityKind,
        /// The conflicting id.
        id: i64,
    },

    /// An atomic scope could not be opened, committed or rolled back.
    #[error("transaction error: {message}")]
    Transaction {
        /// Description of the transaction failure.
        message: String,
    },

    /// An internal backend failure.
    #[error("internal storage error: {message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(kind: EntityKind, id: impl Into<i64>) -> Self {
        Self::Conflict {
            kind,
            id: id.into(),
        }
    }

    /// Creates a new `Transaction` error.
    #[must_use]
    pub fn transaction(message: impl Into<String>) -> Self {
        Self::Transaction {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a conflict error.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
