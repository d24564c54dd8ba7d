//! Sibling position assignment for columns and tasks.
//!
//! Appends read the current sibling maximum and write `max + 1` in one
//! conflict-checked store call. A lost race is recomputed and retried once;
//! a second loss surfaces as [`KanbanError::ConflictRetryable`].

use super::error::{KanbanError, KanbanResult};
use crate::board::{
    domain::{
        BoardId, Column, ColumnId, ColumnName, EntityKind, OwnerId, Position, Slot, Task,
        TaskDraft,
    },
    ports::BoardRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::debug;

/// Number of attempts made for a write that can lose a race.
pub const MAX_ATTEMPTS: usize = 2;

/// Assigns positions so that siblings sort in their intended order.
#[derive(Clone)]
pub struct OrderingEngine<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> OrderingEngine<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Creates an engine writing through `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Inserts a new column on `board_id`.
    ///
    /// With `position` the column is stored there as-is. Without it the
    /// column is appended after its last sibling.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::ConflictRetryable`] when the appended position
    /// is lost twice, [`KanbanError::InvalidReference`] when the board
    /// disappears, and [`KanbanError::ValidationFailed`] when no position
    /// follows the current maximum.
    pub async fn insert_column(
        &self,
        owner: OwnerId,
        board_id: BoardId,
        name: ColumnName,
        position: Option<Position>,
    ) -> KanbanResult<Column> {
        if let Some(explicit) = position {
            let column = Column::new(
                owner,
                board_id,
                name,
                Slot::explicit(explicit),
                &*self.clock,
            );
            self.repository.insert_column(&column).await?;
            return Ok(column);
        }

        let mut attempt = 1;
        loop {
            let max = self.repository.max_column_position(owner, board_id).await?;
            let slot = Slot::appended(Position::after(max)?);
            let column = Column::new(owner, board_id, name.clone(), slot, &*self.clock);
            match self.repository.insert_column(&column).await {
                Ok(()) => return Ok(column),
                Err(err) if err.is_conflict() && attempt < MAX_ATTEMPTS => {
                    debug!(
                        %board_id,
                        position = %slot.position(),
                        attempt,
                        "column position contested, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Inserts a new task into `column_id`.
    ///
    /// # Errors
    ///
    /// Same as [`OrderingEngine::insert_column`], with the column as parent.
    pub async fn insert_task(
        &self,
        owner: OwnerId,
        board_id: BoardId,
        column_id: ColumnId,
        draft: TaskDraft,
        position: Option<Position>,
    ) -> KanbanResult<Task> {
        if let Some(explicit) = position {
            let task = Task::new(
                owner,
                board_id,
                column_id,
                draft,
                Slot::explicit(explicit),
                &*self.clock,
            );
            self.repository.insert_task(&task).await?;
            return Ok(task);
        }

        let mut attempt = 1;
        loop {
            let max = self.repository.max_task_position(owner, column_id).await?;
            let slot = Slot::appended(Position::after(max)?);
            let task = Task::new(
                owner,
                board_id,
                column_id,
                draft.clone(),
                slot,
                &*self.clock,
            );
            match self.repository.insert_task(&task).await {
                Ok(()) => return Ok(task),
                Err(err) if err.is_conflict() && attempt < MAX_ATTEMPTS => {
                    debug!(
                        %column_id,
                        position = %slot.position(),
                        attempt,
                        "task position contested, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Moves `task` to the end of `destination`.
    ///
    /// The column reference and the new position are written together,
    /// conditional on the task's revision. A lost race is retried once
    /// against a fresh read of the task.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::NotFound`] when the task is deleted meanwhile,
    /// [`KanbanError::NoOpRejected`] when a concurrent move already put it in
    /// the destination, [`KanbanError::InvalidReference`] when it was moved
    /// elsewhere or the destination disappears, and
    /// [`KanbanError::ConflictRetryable`] when the second attempt also loses.
    pub async fn relocate_task(&self, task: Task, destination: &Column) -> KanbanResult<Task> {
        let source_column = task.column_id();
        let mut current = task;
        let mut attempt = 1;
        loop {
            let max = self
                .repository
                .max_task_position(current.owner_id(), destination.id())
                .await?;
            let slot = Slot::appended(Position::after(max)?);
            let expected = current.revision();
            let mut moved = current.clone();
            moved.relocate(destination.id(), slot, &*self.clock);
            match self.repository.update_task(&moved, expected).await {
                Ok(()) => return Ok(moved),
                Err(err) if err.is_conflict() && attempt < MAX_ATTEMPTS => {
                    debug!(task_id = %current.id(), attempt, "task move contested, retrying");
                    attempt += 1;
                    current = self
                        .reload_for_move(&current, source_column, destination.id())
                        .await?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn reload_for_move(
        &self,
        stale: &Task,
        source_column: ColumnId,
        destination: ColumnId,
    ) -> KanbanResult<Task> {
        let fresh = self
            .repository
            .find_task(stale.owner_id(), stale.id())
            .await?
            .ok_or_else(|| KanbanError::not_found(EntityKind::Task, stale.id().into_inner()))?;
        if fresh.column_id() == destination {
            return Err(KanbanError::no_op(format!(
                "task {} is already in column {destination}",
                fresh.id()
            )));
        }
        if fresh.column_id() != source_column {
            return Err(KanbanError::invalid_reference(format!(
                "task {} is no longer in column {source_column}",
                fresh.id()
            )));
        }
        Ok(fresh)
    }
}
