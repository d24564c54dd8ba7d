//! Owner-scoped operations on boards, columns, and tasks.

use super::{
    cascade::{CascadeCoordinator, CascadeReport},
    error::{KanbanError, KanbanResult},
    guard::HierarchyGuard,
    ordering::{MAX_ATTEMPTS, OrderingEngine},
    requests::{CreateBoardRequest, CreateColumnRequest, CreateTaskRequest, UpdateTaskRequest},
};
use crate::board::{
    domain::{
        Board, BoardId, BoardName, BoardView, Column, ColumnId, ColumnName, ColumnView,
        EntityKind, OwnerId, Task, TaskId,
    },
    ports::BoardRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::debug;

/// Entry point for every board, column, and task operation.
///
/// Each call takes the verified principal first. Records owned by anybody
/// else behave as if they did not exist.
#[derive(Clone)]
pub struct KanbanService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    guard: HierarchyGuard<R>,
    ordering: OrderingEngine<R, C>,
    cascade: CascadeCoordinator<R>,
}

impl<R, C> KanbanService<R, C>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    /// Creates a service over `repository`, stamping records with `clock`.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            guard: HierarchyGuard::new(Arc::clone(&repository)),
            ordering: OrderingEngine::new(Arc::clone(&repository), Arc::clone(&clock)),
            cascade: CascadeCoordinator::new(Arc::clone(&repository)),
            repository,
            clock,
        }
    }

    /// Creates a board, appending the requested columns in order.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::ValidationFailed`] when the board name or any
    /// column name is invalid. Nothing is written in that case.
    pub async fn create_board(
        &self,
        owner: OwnerId,
        request: CreateBoardRequest,
    ) -> KanbanResult<BoardView> {
        let (name, column_names) = request.validate()?;
        let board = Board::new(owner, name, &*self.clock);
        self.repository.insert_board(&board).await?;

        let mut columns = Vec::with_capacity(column_names.len());
        for column_name in column_names {
            let column = self
                .ordering
                .insert_column(owner, board.id(), column_name, None)
                .await?;
            columns.push(ColumnView {
                column,
                tasks: Vec::new(),
            });
        }
        Ok(BoardView { board, columns })
    }

    /// Lists the owner's boards with their columns and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::Store`] when the store fails.
    pub async fn list_boards(&self, owner: OwnerId) -> KanbanResult<Vec<BoardView>> {
        let boards = self.repository.list_boards(owner).await?;
        let mut views = Vec::with_capacity(boards.len());
        for board in boards {
            views.push(self.board_view(owner, board).await?);
        }
        Ok(views)
    }

    /// Returns one board with its columns and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::NotFound`] when the owner has no such board.
    pub async fn get_board(&self, owner: OwnerId, board_id: BoardId) -> KanbanResult<BoardView> {
        let board = self.guard.target_board(owner, board_id).await?;
        self.board_view(owner, board).await
    }

    /// Renames a board.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::ValidationFailed`] for an invalid name,
    /// [`KanbanError::NotFound`] when the board is missing, and
    /// [`KanbanError::ConflictRetryable`] when concurrent writes keep winning.
    pub async fn rename_board(
        &self,
        owner: OwnerId,
        board_id: BoardId,
        name: impl Into<String>,
    ) -> KanbanResult<BoardView> {
        let new_name = BoardName::new(name)?;
        let mut attempt = 1;
        loop {
            let mut board = self.guard.target_board(owner, board_id).await?;
            let expected = board.revision();
            board.rename(new_name.clone(), &*self.clock);
            match self.repository.update_board(&board, expected).await {
                Ok(()) => return self.board_view(owner, board).await,
                Err(err) if err.is_conflict() && attempt < MAX_ATTEMPTS => {
                    debug!(%board_id, attempt, "board rename contested, retrying");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Deletes a board with all of its columns and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::NotFound`] when the board is missing and
    /// [`KanbanError::CascadeIncomplete`] when descendants could not all be
    /// removed.
    pub async fn delete_board(
        &self,
        owner: OwnerId,
        board_id: BoardId,
    ) -> KanbanResult<CascadeReport> {
        self.guard.target_board(owner, board_id).await?;
        self.cascade.delete_board(owner, board_id).await
    }

    /// Lists a board's columns in presentation order.
    ///
    /// An unknown board yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::Store`] when the store fails.
    pub async fn list_columns(
        &self,
        owner: OwnerId,
        board_id: BoardId,
    ) -> KanbanResult<Vec<Column>> {
        Ok(self.repository.list_columns(owner, board_id).await?)
    }

    /// Creates a column on a board.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::ValidationFailed`] for invalid input,
    /// [`KanbanError::InvalidReference`] when the board is missing, and
    /// [`KanbanError::ConflictRetryable`] when the appended position is lost
    /// twice.
    pub async fn create_column(
        &self,
        owner: OwnerId,
        board_id: BoardId,
        request: CreateColumnRequest,
    ) -> KanbanResult<ColumnView> {
        let (name, position) = request.validate()?;
        self.guard.parent_board(owner, board_id).await?;
        let column = self
            .ordering
            .insert_column(owner, board_id, name, position)
            .await?;
        Ok(ColumnView {
            column,
            tasks: Vec::new(),
        })
    }

    /// Renames a column.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::ValidationFailed`] for an invalid name,
    /// [`KanbanError::InvalidReference`] when the board link fails,
    /// [`KanbanError::NotFound`] when the column is missing, and
    /// [`KanbanError::ConflictRetryable`] when concurrent writes keep winning.
    pub async fn rename_column(
        &self,
        owner: OwnerId,
        board_id: BoardId,
        column_id: ColumnId,
        name: impl Into<String>,
    ) -> KanbanResult<ColumnView> {
        let new_name = ColumnName::new(name)?;
        let mut attempt = 1;
        loop {
            let mut column = self
                .guard
                .target_column(owner, board_id, column_id)
                .await?;
            let expected = column.revision();
            column.rename(new_name.clone(), &*self.clock);
            match self.repository.update_column(&column, expected).await {
                Ok(()) => {
                    let tasks = self.repository.list_tasks(owner, column_id).await?;
                    return Ok(ColumnView { column, tasks });
                }
                Err(err) if err.is_conflict() && attempt < MAX_ATTEMPTS => {
                    debug!(%column_id, attempt, "column rename contested, retrying");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Deletes a column with all of its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::InvalidReference`] when the board link fails,
    /// [`KanbanError::NotFound`] when the column is missing, and
    /// [`KanbanError::CascadeIncomplete`] when tasks could not all be removed.
    pub async fn delete_column(
        &self,
        owner: OwnerId,
        board_id: BoardId,
        column_id: ColumnId,
    ) -> KanbanResult<CascadeReport> {
        self.guard
            .target_column(owner, board_id, column_id)
            .await?;
        self.cascade.delete_column(owner, column_id).await
    }

    /// Creates a task in a column.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::ValidationFailed`] for invalid input,
    /// [`KanbanError::InvalidReference`] when the board or column link fails,
    /// and [`KanbanError::ConflictRetryable`] when the appended position is
    /// lost twice.
    pub async fn create_task(
        &self,
        owner: OwnerId,
        board_id: BoardId,
        column_id: ColumnId,
        request: CreateTaskRequest,
    ) -> KanbanResult<Task> {
        let (draft, position) = request.validate()?;
        self.guard
            .parent_column(owner, board_id, column_id)
            .await?;
        self.ordering
            .insert_task(owner, board_id, column_id, draft, position)
            .await
    }

    /// Returns one task addressed through its board and column.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::InvalidReference`] when a link fails and
    /// [`KanbanError::NotFound`] when the task is missing.
    pub async fn get_task(
        &self,
        owner: OwnerId,
        board_id: BoardId,
        column_id: ColumnId,
        task_id: TaskId,
    ) -> KanbanResult<Task> {
        self.guard
            .target_task(owner, board_id, column_id, task_id)
            .await
    }

    /// Lists a column's tasks in presentation order.
    ///
    /// An unknown column yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::Store`] when the store fails.
    pub async fn list_tasks(&self, owner: OwnerId, column_id: ColumnId) -> KanbanResult<Vec<Task>> {
        Ok(self.repository.list_tasks(owner, column_id).await?)
    }

    /// Applies a partial update to a task.
    ///
    /// An update without fields returns the task unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::ValidationFailed`] for invalid input,
    /// [`KanbanError::InvalidReference`] when a link fails,
    /// [`KanbanError::NotFound`] when the task is missing, and
    /// [`KanbanError::ConflictRetryable`] when concurrent writes keep winning.
    pub async fn update_task(
        &self,
        owner: OwnerId,
        board_id: BoardId,
        column_id: ColumnId,
        task_id: TaskId,
        request: UpdateTaskRequest,
    ) -> KanbanResult<Task> {
        let changes = request.validate()?;
        let mut attempt = 1;
        loop {
            let mut task = self
                .guard
                .target_task(owner, board_id, column_id, task_id)
                .await?;
            if changes.is_empty() {
                return Ok(task);
            }
            let expected = task.revision();
            task.apply(changes.clone(), &*self.clock);
            match self.repository.update_task(&task, expected).await {
                Ok(()) => return Ok(task),
                Err(err) if err.is_conflict() && attempt < MAX_ATTEMPTS => {
                    debug!(%task_id, attempt, "task update contested, retrying");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Moves a task to the end of another column on the same board.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::NoOpRejected`] when the task already lives in
    /// the destination, [`KanbanError::InvalidReference`] when the
    /// destination is missing or on another board, [`KanbanError::NotFound`]
    /// when the task is missing, and [`KanbanError::ConflictRetryable`] when
    /// the move loses a race twice. A rejected move leaves the task as it was.
    pub async fn move_task(
        &self,
        owner: OwnerId,
        board_id: BoardId,
        column_id: ColumnId,
        task_id: TaskId,
        to_column_id: ColumnId,
    ) -> KanbanResult<Task> {
        let task = self
            .guard
            .target_task(owner, board_id, column_id, task_id)
            .await?;
        let destination = self.guard.move_destination(&task, to_column_id).await?;
        self.ordering.relocate_task(task, &destination).await
    }

    /// Deletes a task and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::InvalidReference`] when a link fails and
    /// [`KanbanError::NotFound`] when the task is missing or was deleted
    /// concurrently.
    pub async fn delete_task(
        &self,
        owner: OwnerId,
        board_id: BoardId,
        column_id: ColumnId,
        task_id: TaskId,
    ) -> KanbanResult<Task> {
        let task = self
            .guard
            .target_task(owner, board_id, column_id, task_id)
            .await?;
        if !self.repository.delete_task(owner, task_id).await? {
            return Err(KanbanError::not_found(
                EntityKind::Task,
                task_id.into_inner(),
            ));
        }
        Ok(task)
    }

    async fn board_view(&self, owner: OwnerId, board: Board) -> KanbanResult<BoardView> {
        let columns = self.repository.list_columns(owner, board.id()).await?;
        let mut views = Vec::with_capacity(columns.len());
        for column in columns {
            let tasks = self.repository.list_tasks(owner, column.id()).await?;
            views.push(ColumnView { column, tasks });
        }
        Ok(BoardView {
            board,
            columns: views,
        })
    }
}
