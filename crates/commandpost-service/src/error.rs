//! Error taxonomy of the service layer.
//!
//! Every orchestrator failure surfaces as one of these variants, each
//! naming the offending entity kind and id. Validators and the role gate
//! fail fast before any write occurs; storage failures propagate unchanged.

use std::fmt;

use commandpost_core::EntityKind;
use commandpost_storage::StorageError;

/// Errors produced by the mutation orchestrators and their collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A referenced entity does not exist under the required visibility.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// The kind of the missing entity.
        kind: EntityKind,
        /// The missing id.
        id: i64,
    },

    /// A delete was blocked by live dependents.
    #[error("cannot delete {kind} {id}: {reason}")]
    Conflict {
        /// The kind of the entity that could not be deleted.
        kind: EntityKind,
        /// The id that could not be deleted.
        id: i64,
        /// What blocked the deletion.
        reason: String,
    },

    /// A mutation expected to affect exactly one row affected none.
    #[error("no {kind} row affected for id {id}")]
    DeletionFailed {
        /// The kind of the entity the mutation targeted.
        kind: EntityKind,
        /// The targeted id.
        id: i64,
    },

    /// The role gate rejected the caller.
    #[error("unauthorized: {reason}")]
    Unauthorized {
        /// Why the caller was rejected.
        reason: String,
    },

    /// A malformed or missing required argument.
    #[error("validation failed: {message}")]
    Validation {
        /// Description of the invalid argument.
        message: String,
    },

    /// A storage backend failure, propagated unchanged.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ServiceError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(kind: EntityKind, id: impl Into<i64>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(kind: EntityKind, id: impl Into<i64>, reason: impl Into<String>) -> Self {
        Self::Conflict {
            kind,
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new `DeletionFailed` error.
    #[must_use]
    pub fn deletion_failed(kind: EntityKind, id: impl Into<i64>) -> Self {
        Self::DeletionFailed {
            kind,
            id: id.into(),
        }
    }

    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Creates a new `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a conflict error.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns `true` if this is an unauthorized error.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns the error category for logging and API error extensions.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Conflict { .. } => ErrorCategory::Conflict,
            Self::DeletionFailed { .. } => ErrorCategory::Deletion,
            Self::Unauthorized { .. } => ErrorCategory::Auth,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Storage(_) => ErrorCategory::Storage,
        }
    }
}

/// Categories of service errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    NotFound,
    Conflict,
    Deletion,
    Auth,
    Validation,
    Storage,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Deletion => write!(f, "deletion"),
            Self::Auth => write!(f, "auth"),
            Self::Validation => write!(f, "validation"),
            Self::Storage => write!(f, "storage"),
        }
    }
}
