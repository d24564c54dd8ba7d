//! Error taxonomy surfaced by board services.

use crate::board::{
    domain::{BoardDomainError, EntityKind},
    ports::BoardRepositoryError,
};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Result type for board service operations.
pub type KanbanResult<T> = Result<T, KanbanError>;

/// Failures reported to callers of the board services.
///
/// Store details are never part of the display text. They stay reachable
/// through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum KanbanError {
    /// The entity is absent or owned by another principal.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of the missing entity.
        entity: EntityKind,
        /// Requested identifier.
        id: Uuid,
    },

    /// A parent, child, or board link does not hold.
    #[error("invalid reference: {reason}")]
    InvalidReference {
        /// Which link failed.
        reason: String,
    },

    /// A field constraint was violated.
    #[error("validation failed: {0}")]
    ValidationFailed(#[from] BoardDomainError),

    /// The request would not change anything.
    #[error("no-op rejected: {reason}")]
    NoOpRejected {
        /// Why the request is a no-op.
        reason: String,
    },

    /// A concurrent write won the race even after one retry.
    #[error("concurrent modification of {entity} {id}, retry the operation")]
    ConflictRetryable {
        /// Kind of the contested entity.
        entity: EntityKind,
        /// Contested identifier.
        id: Uuid,
    },

    /// A cascading delete stopped before the entity was fully removed.
    #[error("could not fully delete {entity} {id}")]
    CascadeIncomplete {
        /// Kind of the topmost entity left behind.
        entity: EntityKind,
        /// Identifier of the topmost entity left behind.
        id: Uuid,
        /// Store failure that stopped the cascade.
        #[source]
        source: BoardRepositoryError,
    },

    /// The store failed for a reason callers cannot act on.
    #[error("storage operation failed")]
    Store(#[source] BoardRepositoryError),
}

impl KanbanError {
    /// Creates an [`KanbanError::InvalidReference`] error.
    #[must_use]
    pub fn invalid_reference(reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            reason: reason.into(),
        }
    }

    /// Creates a [`KanbanError::NoOpRejected`] error.
    #[must_use]
    pub fn no_op(reason: impl Into<String>) -> Self {
        Self::NoOpRejected {
            reason: reason.into(),
        }
    }

    /// Creates a [`KanbanError::NotFound`] error.
    #[must_use]
    pub const fn not_found(entity: EntityKind, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    /// Returns the stable kind identifier of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidReference { .. } => ErrorKind::InvalidReference,
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
            Self::NoOpRejected { .. } => ErrorKind::NoOpRejected,
            Self::ConflictRetryable { .. } => ErrorKind::ConflictRetryable,
            Self::CascadeIncomplete { .. } => ErrorKind::CascadeIncomplete,
            Self::Store(_) => ErrorKind::StoreFailure,
        }
    }
}

impl From<BoardRepositoryError> for KanbanError {
    fn from(err: BoardRepositoryError) -> Self {
        match err {
            BoardRepositoryError::NotFound { entity, id } => Self::NotFound { entity, id },
            BoardRepositoryError::ParentMissing { entity, id } => {
                Self::invalid_reference(format!("{entity} {id} does not exist"))
            }
            BoardRepositoryError::PositionTaken {
                parent, parent_id, ..
            } => Self::ConflictRetryable {
                entity: parent,
                id: parent_id,
            },
            BoardRepositoryError::RevisionMismatch { entity, id } => {
                Self::ConflictRetryable { entity, id }
            }
            other => Self::Store(other),
        }
    }
}

/// Stable, machine-readable error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// `not_found`
    NotFound,
    /// `invalid_reference`
    InvalidReference,
    /// `validation_failed`
    ValidationFailed,
    /// `no_op_rejected`
    NoOpRejected,
    /// `conflict_retryable`
    ConflictRetryable,
    /// `cascade_incomplete`
    CascadeIncomplete,
    /// `store_failure`
    StoreFailure,
}

impl ErrorKind {
    /// Returns the snake-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidReference => "invalid_reference",
            Self::ValidationFailed => "validation_failed",
            Self::NoOpRejected => "no_op_rejected",
            Self::ConflictRetryable => "conflict_retryable",
            Self::CascadeIncomplete => "cascade_incomplete",
            Self::StoreFailure => "store_failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
