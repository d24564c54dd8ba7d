//! Ownership and parent-chain checks run before every mutation.
//!
//! The guard reads current state and holds no locks. Races between the check
//! and the write are closed by the store's own conditions.

use super::error::{KanbanError, KanbanResult};
use crate::board::{
    domain::{Board, BoardId, Column, ColumnId, EntityKind, OwnerId, Task, TaskId},
    ports::BoardRepository,
};
use std::sync::Arc;

/// Resolves owner-scoped references into records, or explains why not.
#[derive(Clone)]
pub struct HierarchyGuard<R>
where
    R: BoardRepository,
{
    repository: Arc<R>,
}

impl<R> HierarchyGuard<R>
where
    R: BoardRepository,
{
    /// Creates a guard reading from `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Loads a board that is itself the target of an operation.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::NotFound`] when the owner has no such board.
    pub async fn target_board(&self, owner: OwnerId, board_id: BoardId) -> KanbanResult<Board> {
        self.repository
            .find_board(owner, board_id)
            .await?
            .ok_or_else(|| KanbanError::not_found(EntityKind::Board, board_id.into_inner()))
    }

    /// Loads the board a new column will be attached to.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::InvalidReference`] when the owner has no such
    /// board.
    pub async fn parent_board(&self, owner: OwnerId, board_id: BoardId) -> KanbanResult<Board> {
        self.repository
            .find_board(owner, board_id)
            .await?
            .ok_or_else(|| {
                KanbanError::invalid_reference(format!("board {board_id} does not exist"))
            })
    }

    /// Loads a column that is the target of an operation on `board_id`.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::InvalidReference`] when the board is missing or
    /// the column sits on another board, and [`KanbanError::NotFound`] when
    /// the column is missing.
    pub async fn target_column(
        &self,
        owner: OwnerId,
        board_id: BoardId,
        column_id: ColumnId,
    ) -> KanbanResult<Column> {
        self.parent_board(owner, board_id).await?;
        let column = self
            .repository
            .find_column(owner, column_id)
            .await?
            .ok_or_else(|| KanbanError::not_found(EntityKind::Column, column_id.into_inner()))?;
        ensure_on_board(&column, board_id)?;
        Ok(column)
    }

    /// Loads the column a task will be attached to.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::InvalidReference`] when the board or column is
    /// missing or the column sits on another board.
    pub async fn parent_column(
        &self,
        owner: OwnerId,
        board_id: BoardId,
        column_id: ColumnId,
    ) -> KanbanResult<Column> {
        self.parent_board(owner, board_id).await?;
        let column = self
            .repository
            .find_column(owner, column_id)
            .await?
            .ok_or_else(|| {
                KanbanError::invalid_reference(format!("column {column_id} does not exist"))
            })?;
        ensure_on_board(&column, board_id)?;
        Ok(column)
    }

    /// Loads a task addressed through its board and column.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::InvalidReference`] when any link in the chain
    /// fails and [`KanbanError::NotFound`] when the task is missing.
    pub async fn target_task(
        &self,
        owner: OwnerId,
        board_id: BoardId,
        column_id: ColumnId,
        task_id: TaskId,
    ) -> KanbanResult<Task> {
        self.parent_column(owner, board_id, column_id).await?;
        let task = self
            .repository
            .find_task(owner, task_id)
            .await?
            .ok_or_else(|| KanbanError::not_found(EntityKind::Task, task_id.into_inner()))?;
        if task.column_id() != column_id || task.board_id() != board_id {
            return Err(KanbanError::invalid_reference(format!(
                "task {task_id} does not belong to column {column_id}"
            )));
        }
        Ok(task)
    }

    /// Loads the destination column of a move.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::NoOpRejected`] when the task already lives in
    /// the destination, and [`KanbanError::InvalidReference`] when the
    /// destination is missing or sits on another board.
    pub async fn move_destination(
        &self,
        task: &Task,
        to_column_id: ColumnId,
    ) -> KanbanResult<Column> {
        if task.column_id() == to_column_id {
            return Err(KanbanError::no_op(format!(
                "task {} is already in column {to_column_id}",
                task.id()
            )));
        }
        let destination = self
            .repository
            .find_column(task.owner_id(), to_column_id)
            .await?
            .ok_or_else(|| {
                KanbanError::invalid_reference(format!(
                    "destination column {to_column_id} does not exist"
                ))
            })?;
        if destination.board_id() != task.board_id() {
            return Err(KanbanError::invalid_reference(format!(
                "destination column {to_column_id} belongs to another board"
            )));
        }
        Ok(destination)
    }
}

fn ensure_on_board(column: &Column, board_id: BoardId) -> KanbanResult<()> {
    if column.board_id() != board_id {
        return Err(KanbanError::invalid_reference(format!(
            "column {} does not belong to board {board_id}",
            column.id()
        )));
    }
    Ok(())
}
