//! Thread-safe in-memory board repository.
//!
//! All records live behind one lock, so every check and the write it guards
//! happen atomically.

use crate::board::{
    domain::{
        Board, BoardId, Column, ColumnId, EntityKind, OwnerId, Placement, Position, Revision,
        Task, TaskId,
    },
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory board repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoardRepository {
    state: Arc<RwLock<InMemoryBoardState>>,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    boards: HashMap<BoardId, Board>,
    columns: HashMap<ColumnId, Column>,
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryBoardRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> BoardRepositoryResult<RwLockReadGuard<'_, InMemoryBoardState>> {
        self.state.read().map_err(|err| {
            BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> BoardRepositoryResult<RwLockWriteGuard<'_, InMemoryBoardState>> {
        self.state.write().map_err(|err| {
            BoardRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl InMemoryBoardState {
    fn owned_board(&self, owner: OwnerId, id: BoardId) -> Option<&Board> {
        self.boards.get(&id).filter(|board| board.owner_id() == owner)
    }

    fn owned_column(&self, owner: OwnerId, id: ColumnId) -> Option<&Column> {
        self.columns
            .get(&id)
            .filter(|column| column.owner_id() == owner)
    }

    fn owned_task(&self, owner: OwnerId, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id).filter(|task| task.owner_id() == owner)
    }

    fn ensure_board_parent(&self, column: &Column) -> BoardRepositoryResult<()> {
        if self
            .owned_board(column.owner_id(), column.board_id())
            .is_none()
        {
            return Err(BoardRepositoryError::ParentMissing {
                entity: EntityKind::Board,
                id: column.board_id().into_inner(),
            });
        }
        Ok(())
    }

    fn ensure_column_parent(&self, task: &Task) -> BoardRepositoryResult<()> {
        let linked = self
            .owned_column(task.owner_id(), task.column_id())
            .is_some_and(|column| column.board_id() == task.board_id());
        if !linked {
            return Err(BoardRepositoryError::ParentMissing {
                entity: EntityKind::Column,
                id: task.column_id().into_inner(),
            });
        }
        Ok(())
    }

    fn ensure_column_slot_free(&self, column: &Column) -> BoardRepositoryResult<()> {
        if column.placement() != Placement::Appended {
            return Ok(());
        }
        let taken = self.columns.values().any(|sibling| {
            sibling.id() != column.id()
                && sibling.board_id() == column.board_id()
                && sibling.placement() == Placement::Appended
                && sibling.position() == column.position()
        });
        if taken {
            return Err(BoardRepositoryError::PositionTaken {
                parent: EntityKind::Board,
                parent_id: column.board_id().into_inner(),
                position: column.position(),
            });
        }
        Ok(())
    }

    fn ensure_task_slot_free(&self, task: &Task) -> BoardRepositoryResult<()> {
        if task.placement() != Placement::Appended {
            return Ok(());
        }
        let taken = self.tasks.values().any(|sibling| {
            sibling.id() != task.id()
                && sibling.column_id() == task.column_id()
                && sibling.placement() == Placement::Appended
                && sibling.position() == task.position()
        });
        if taken {
            return Err(BoardRepositoryError::PositionTaken {
                parent: EntityKind::Column,
                parent_id: task.column_id().into_inner(),
                position: task.position(),
            });
        }
        Ok(())
    }
}

fn check_revision(
    entity: EntityKind,
    id: uuid::Uuid,
    stored: Option<Revision>,
    expected: Revision,
) -> BoardRepositoryResult<()> {
    match stored {
        None => Err(BoardRepositoryError::NotFound { entity, id }),
        Some(revision) if revision != expected => {
            Err(BoardRepositoryError::RevisionMismatch { entity, id })
        }
        Some(_) => Ok(()),
    }
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn insert_board(&self, board: &Board) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        if state.boards.contains_key(&board.id()) {
            return Err(BoardRepositoryError::Duplicate {
                entity: EntityKind::Board,
                id: board.id().into_inner(),
            });
        }
        state.boards.insert(board.id(), board.clone());
        Ok(())
    }

    async fn find_board(
        &self,
        owner: OwnerId,
        id: BoardId,
    ) -> BoardRepositoryResult<Option<Board>> {
        let state = self.read()?;
        Ok(state.owned_board(owner, id).cloned())
    }

    async fn list_boards(&self, owner: OwnerId) -> BoardRepositoryResult<Vec<Board>> {
        let state = self.read()?;
        let mut boards: Vec<Board> = state
            .boards
            .values()
            .filter(|board| board.owner_id() == owner)
            .cloned()
            .collect();
        boards.sort_by_key(|board| (board.created_at(), board.id().into_inner()));
        Ok(boards)
    }

    async fn update_board(&self, board: &Board, expected: Revision) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .owned_board(board.owner_id(), board.id())
            .map(Board::revision);
        check_revision(EntityKind::Board, board.id().into_inner(), stored, expected)?;
        state.boards.insert(board.id(), board.clone());
        Ok(())
    }

    async fn delete_board(&self, owner: OwnerId, id: BoardId) -> BoardRepositoryResult<bool> {
        let mut state = self.write()?;
        if state.owned_board(owner, id).is_none() {
            return Ok(false);
        }
        if state.columns.values().any(|column| column.board_id() == id) {
            return Err(BoardRepositoryError::HasDependents {
                entity: EntityKind::Board,
                id: id.into_inner(),
            });
        }
        Ok(state.boards.remove(&id).is_some())
    }

    async fn max_column_position(
        &self,
        owner: OwnerId,
        board_id: BoardId,
    ) -> BoardRepositoryResult<Option<Position>> {
        let state = self.read()?;
        Ok(state
            .columns
            .values()
            .filter(|column| column.owner_id() == owner && column.board_id() == board_id)
            .map(Column::position)
            .max())
    }

    async fn insert_column(&self, column: &Column) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        if state.columns.contains_key(&column.id()) {
            return Err(BoardRepositoryError::Duplicate {
                entity: EntityKind::Column,
                id: column.id().into_inner(),
            });
        }
        state.ensure_board_parent(column)?;
        state.ensure_column_slot_free(column)?;
        state.columns.insert(column.id(), column.clone());
        Ok(())
    }

    async fn find_column(
        &self,
        owner: OwnerId,
        id: ColumnId,
    ) -> BoardRepositoryResult<Option<Column>> {
        let state = self.read()?;
        Ok(state.owned_column(owner, id).cloned())
    }

    async fn list_columns(
        &self,
        owner: OwnerId,
        board_id: BoardId,
    ) -> BoardRepositoryResult<Vec<Column>> {
        let state = self.read()?;
        let mut columns: Vec<Column> = state
            .columns
            .values()
            .filter(|column| column.owner_id() == owner && column.board_id() == board_id)
            .cloned()
            .collect();
        columns.sort_by_key(|column| {
            (
                column.position(),
                column.created_at(),
                column.id().into_inner(),
            )
        });
        Ok(columns)
    }

    async fn update_column(
        &self,
        column: &Column,
        expected: Revision,
    ) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .owned_column(column.owner_id(), column.id())
            .map(Column::revision);
        check_revision(
            EntityKind::Column,
            column.id().into_inner(),
            stored,
            expected,
        )?;
        state.ensure_column_slot_free(column)?;
        state.columns.insert(column.id(), column.clone());
        Ok(())
    }

    async fn delete_column(&self, owner: OwnerId, id: ColumnId) -> BoardRepositoryResult<bool> {
        let mut state = self.write()?;
        if state.owned_column(owner, id).is_none() {
            return Ok(false);
        }
        if state.tasks.values().any(|task| task.column_id() == id) {
            return Err(BoardRepositoryError::HasDependents {
                entity: EntityKind::Column,
                id: id.into_inner(),
            });
        }
        Ok(state.columns.remove(&id).is_some())
    }

    async fn max_task_position(
        &self,
        owner: OwnerId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<Option<Position>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.owner_id() == owner && task.column_id() == column_id)
            .map(Task::position)
            .max())
    }

    async fn insert_task(&self, task: &Task) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(BoardRepositoryError::Duplicate {
                entity: EntityKind::Task,
                id: task.id().into_inner(),
            });
        }
        state.ensure_column_parent(task)?;
        state.ensure_task_slot_free(task)?;
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_task(&self, owner: OwnerId, id: TaskId) -> BoardRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.owned_task(owner, id).cloned())
    }

    async fn list_tasks(
        &self,
        owner: OwnerId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.owner_id() == owner && task.column_id() == column_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.position(), task.created_at(), task.id().into_inner()));
        Ok(tasks)
    }

    async fn update_task(&self, task: &Task, expected: Revision) -> BoardRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .owned_task(task.owner_id(), task.id())
            .map(Task::revision);
        check_revision(EntityKind::Task, task.id().into_inner(), stored, expected)?;
        state.ensure_column_parent(task)?;
        state.ensure_task_slot_free(task)?;
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete_task(&self, owner: OwnerId, id: TaskId) -> BoardRepositoryResult<bool> {
        let mut state = self.write()?;
        if state.owned_task(owner, id).is_none() {
            return Ok(false);
        }
        Ok(state.tasks.remove(&id).is_some())
    }

    async fn delete_tasks_in_column(
        &self,
        owner: OwnerId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<usize> {
        let mut state = self.write()?;
        let before = state.tasks.len();
        state
            .tasks
            .retain(|_, task| !(task.owner_id() == owner && task.column_id() == column_id));
        Ok(before - state.tasks.len())
    }
}
