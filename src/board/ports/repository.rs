//! Repository port for boards, columns, and tasks.
//!
//! Every query is scoped by the owning principal. A record owned by somebody
//! else is indistinguishable from a missing one.

use crate::board::domain::{
    Board, BoardId, Column, ColumnId, EntityKind, OwnerId, Position, Revision, Task, TaskId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Result type for board repository operations.
pub type BoardRepositoryResult<T> = Result<T, BoardRepositoryError>;

/// Persistence contract for the board hierarchy.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Stores a new board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::Duplicate`] when the board ID already
    /// exists.
    async fn insert_board(&self, board: &Board) -> BoardRepositoryResult<()>;

    /// Finds a board by identifier for its owner.
    async fn find_board(&self, owner: OwnerId, id: BoardId)
    -> BoardRepositoryResult<Option<Board>>;

    /// Returns the owner's boards sorted by creation time.
    async fn list_boards(&self, owner: OwnerId) -> BoardRepositoryResult<Vec<Board>>;

    /// Replaces a board when its stored revision equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::NotFound`] when the board is gone or
    /// [`BoardRepositoryError::RevisionMismatch`] when it changed since it
    /// was read.
    async fn update_board(&self, board: &Board, expected: Revision) -> BoardRepositoryResult<()>;

    /// Deletes a board that no longer has columns.
    ///
    /// Returns `false` when the board was already absent.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::HasDependents`] while columns remain.
    async fn delete_board(&self, owner: OwnerId, id: BoardId) -> BoardRepositoryResult<bool>;

    /// Returns the highest column position on a board, if any.
    async fn max_column_position(
        &self,
        owner: OwnerId,
        board_id: BoardId,
    ) -> BoardRepositoryResult<Option<Position>>;

    /// Stores a new column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::ParentMissing`] when the board does
    /// not exist for the owner, or [`BoardRepositoryError::PositionTaken`]
    /// when an appended sibling already holds the appended position.
    async fn insert_column(&self, column: &Column) -> BoardRepositoryResult<()>;

    /// Finds a column by identifier for its owner.
    async fn find_column(
        &self,
        owner: OwnerId,
        id: ColumnId,
    ) -> BoardRepositoryResult<Option<Column>>;

    /// Returns a board's columns in presentation order.
    async fn list_columns(
        &self,
        owner: OwnerId,
        board_id: BoardId,
    ) -> BoardRepositoryResult<Vec<Column>>;

    /// Replaces a column when its stored revision equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::NotFound`] or
    /// [`BoardRepositoryError::RevisionMismatch`].
    async fn update_column(&self, column: &Column, expected: Revision)
    -> BoardRepositoryResult<()>;

    /// Deletes a column that no longer has tasks.
    ///
    /// Returns `false` when the column was already absent.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::HasDependents`] while tasks remain.
    async fn delete_column(&self, owner: OwnerId, id: ColumnId) -> BoardRepositoryResult<bool>;

    /// Returns the highest task position in a column, if any.
    async fn max_task_position(
        &self,
        owner: OwnerId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<Option<Position>>;

    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::ParentMissing`] when the column does
    /// not exist under the task's board for the owner, or
    /// [`BoardRepositoryError::PositionTaken`] when an appended sibling
    /// already holds the appended position.
    async fn insert_task(&self, task: &Task) -> BoardRepositoryResult<()>;

    /// Finds a task by identifier for its owner.
    async fn find_task(&self, owner: OwnerId, id: TaskId) -> BoardRepositoryResult<Option<Task>>;

    /// Returns a column's tasks in presentation order.
    async fn list_tasks(
        &self,
        owner: OwnerId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<Vec<Task>>;

    /// Replaces a task when its stored revision equals `expected`.
    ///
    /// The task's column is re-checked against its board, so a move and its
    /// new position land together or not at all.
    ///
    /// # Errors
    ///
    /// Returns [`BoardRepositoryError::NotFound`],
    /// [`BoardRepositoryError::RevisionMismatch`],
    /// [`BoardRepositoryError::ParentMissing`], or
    /// [`BoardRepositoryError::PositionTaken`].
    async fn update_task(&self, task: &Task, expected: Revision) -> BoardRepositoryResult<()>;

    /// Deletes a task.
    ///
    /// Returns `false` when the task was already absent.
    async fn delete_task(&self, owner: OwnerId, id: TaskId) -> BoardRepositoryResult<bool>;

    /// Deletes every task in a column and returns how many were removed.
    async fn delete_tasks_in_column(
        &self,
        owner: OwnerId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<usize>;
}

/// Errors returned by board repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BoardRepositoryError {
    /// A record with the same identifier already exists.
    #[error("duplicate {entity} identifier: {id}")]
    Duplicate {
        /// Kind of the conflicting record.
        entity: EntityKind,
        /// Conflicting identifier.
        id: Uuid,
    },

    /// The record does not exist for the owner.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of the missing record.
        entity: EntityKind,
        /// Missing identifier.
        id: Uuid,
    },

    /// The parent of a new or moved record does not exist for the owner.
    #[error("parent {entity} not found: {id}")]
    ParentMissing {
        /// Kind of the missing parent.
        entity: EntityKind,
        /// Missing parent identifier.
        id: Uuid,
    },

    /// An appended sibling already occupies the position.
    #[error("position {position} already taken under {parent} {parent_id}")]
    PositionTaken {
        /// Kind of the parent whose children collided.
        parent: EntityKind,
        /// Parent identifier.
        parent_id: Uuid,
        /// Contested position.
        position: Position,
    },

    /// The record changed since it was read.
    #[error("{entity} {id} was modified concurrently")]
    RevisionMismatch {
        /// Kind of the contested record.
        entity: EntityKind,
        /// Contested identifier.
        id: Uuid,
    },

    /// The record still has children.
    #[error("{entity} {id} still has dependent records")]
    HasDependents {
        /// Kind of the parent record.
        entity: EntityKind,
        /// Parent identifier.
        id: Uuid,
    },

    /// A stored row could not be turned back into a domain value.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BoardRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a decoding failure for stored data.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Returns `true` for lost races that a fresh attempt may resolve.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::PositionTaken { .. } | Self::RevisionMismatch { .. }
        )
    }
}

impl From<diesel::result::Error> for BoardRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
