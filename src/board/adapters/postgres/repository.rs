//! `PostgreSQL` repository implementation for the board hierarchy.
//!
//! Inserts and moves lock the parent row with `SELECT ... FOR UPDATE` inside
//! one transaction. The partial unique indexes on appended positions and the
//! `ON DELETE RESTRICT` foreign keys back every check made here.

use super::{
    models::{BoardRow, ColumnRow, NewBoardRow, NewColumnRow, TaskRecord, TaskRow},
    schema::{board_columns, boards, tasks},
};
use crate::board::{
    domain::{
        Board, BoardId, BoardName, Column, ColumnId, ColumnName, EntityKind, OwnerId,
        PersistedBoardData, PersistedColumnData, PersistedTaskData, Placement, Position, Revision,
        Subtask, Task, TaskDescription, TaskId, TaskTitle,
    },
    ports::{BoardRepository, BoardRepositoryError, BoardRepositoryResult},
};
use async_trait::async_trait;
use diesel::dsl::max;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by board adapters.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

const COLUMN_POSITION_INDEX: &str = "idx_board_columns_appended_position";
const TASK_POSITION_INDEX: &str = "idx_tasks_appended_position";

/// `PostgreSQL`-backed board repository.
#[derive(Debug, Clone)]
pub struct PostgresBoardRepository {
    pool: BoardPgPool,
}

impl PostgresBoardRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> BoardRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BoardRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BoardRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(BoardRepositoryError::persistence)?
    }
}

#[async_trait]
impl BoardRepository for PostgresBoardRepository {
    async fn insert_board(&self, board: &Board) -> BoardRepositoryResult<()> {
        let board_id = board.id().into_inner();
        let new_row = NewBoardRow {
            id: board_id,
            owner_id: board.owner_id().into_inner(),
            name: board.name().as_str().to_owned(),
            revision: board.revision().value(),
            created_at: board.created_at(),
            updated_at: board.updated_at(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(boards::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        BoardRepositoryError::Duplicate {
                            entity: EntityKind::Board,
                            id: board_id,
                        }
                    }
                    _ => BoardRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_board(
        &self,
        owner: OwnerId,
        id: BoardId,
    ) -> BoardRepositoryResult<Option<Board>> {
        self.run_blocking(move |connection| {
            let row = boards::table
                .filter(boards::id.eq(id.into_inner()))
                .filter(boards::owner_id.eq(owner.into_inner()))
                .select(BoardRow::as_select())
                .first::<BoardRow>(connection)
                .optional()?;
            row.map(row_to_board).transpose()
        })
        .await
    }

    async fn list_boards(&self, owner: OwnerId) -> BoardRepositoryResult<Vec<Board>> {
        self.run_blocking(move |connection| {
            let rows = boards::table
                .filter(boards::owner_id.eq(owner.into_inner()))
                .order((boards::created_at.asc(), boards::id.asc()))
                .select(BoardRow::as_select())
                .load::<BoardRow>(connection)?;
            rows.into_iter().map(row_to_board).collect()
        })
        .await
    }

    async fn update_board(&self, board: &Board, expected: Revision) -> BoardRepositoryResult<()> {
        let board_id = board.id().into_inner();
        let owner_id = board.owner_id().into_inner();
        let name = board.name().as_str().to_owned();
        let revision = board.revision().value();
        let updated_at = board.updated_at();
        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardRepositoryError, _>(|tx| {
                let stored = boards::table
                    .filter(boards::id.eq(board_id))
                    .filter(boards::owner_id.eq(owner_id))
                    .select(boards::revision)
                    .for_update()
                    .first::<i64>(tx)
                    .optional()?;
                check_revision(EntityKind::Board, board_id, stored, expected)?;
                diesel::update(boards::table.filter(boards::id.eq(board_id)))
                    .set((
                        boards::name.eq(&name),
                        boards::revision.eq(revision),
                        boards::updated_at.eq(updated_at),
                    ))
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn delete_board(&self, owner: OwnerId, id: BoardId) -> BoardRepositoryResult<bool> {
        let board_id = id.into_inner();
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                boards::table
                    .filter(boards::id.eq(board_id))
                    .filter(boards::owner_id.eq(owner.into_inner())),
            )
            .execute(connection)
            .map_err(|err| map_delete_error(err, EntityKind::Board, board_id))?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn max_column_position(
        &self,
        owner: OwnerId,
        board_id: BoardId,
    ) -> BoardRepositoryResult<Option<Position>> {
        self.run_blocking(move |connection| {
            let value = board_columns::table
                .filter(board_columns::owner_id.eq(owner.into_inner()))
                .filter(board_columns::board_id.eq(board_id.into_inner()))
                .select(max(board_columns::position))
                .get_result::<Option<i64>>(connection)?;
            value.map(decode_position).transpose()
        })
        .await
    }

    async fn insert_column(&self, column: &Column) -> BoardRepositoryResult<()> {
        let new_row = to_new_column_row(column);
        let position = column.position();
        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardRepositoryError, _>(|tx| {
                lock_board(tx, new_row.owner_id, new_row.board_id)?;
                if new_row.placement == Placement::Appended.as_str()
                    && appended_column_exists(tx, &new_row)?
                {
                    return Err(position_taken(EntityKind::Board, new_row.board_id, position));
                }
                diesel::insert_into(board_columns::table)
                    .values(&new_row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                            if is_constraint(info.as_ref(), COLUMN_POSITION_INDEX) =>
                        {
                            position_taken(EntityKind::Board, new_row.board_id, position)
                        }
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            BoardRepositoryError::Duplicate {
                                entity: EntityKind::Column,
                                id: new_row.id,
                            }
                        }
                        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                            BoardRepositoryError::ParentMissing {
                                entity: EntityKind::Board,
                                id: new_row.board_id,
                            }
                        }
                        _ => BoardRepositoryError::persistence(err),
                    })?;
                Ok(())
            })
        })
        .await
    }

    async fn find_column(
        &self,
        owner: OwnerId,
        id: ColumnId,
    ) -> BoardRepositoryResult<Option<Column>> {
        self.run_blocking(move |connection| {
            let row = board_columns::table
                .filter(board_columns::id.eq(id.into_inner()))
                .filter(board_columns::owner_id.eq(owner.into_inner()))
                .select(ColumnRow::as_select())
                .first::<ColumnRow>(connection)
                .optional()?;
            row.map(row_to_column).transpose()
        })
        .await
    }

    async fn list_columns(
        &self,
        owner: OwnerId,
        board_id: BoardId,
    ) -> BoardRepositoryResult<Vec<Column>> {
        self.run_blocking(move |connection| {
            let rows = board_columns::table
                .filter(board_columns::owner_id.eq(owner.into_inner()))
                .filter(board_columns::board_id.eq(board_id.into_inner()))
                .order((
                    board_columns::position.asc(),
                    board_columns::created_at.asc(),
                    board_columns::id.asc(),
                ))
                .select(ColumnRow::as_select())
                .load::<ColumnRow>(connection)?;
            rows.into_iter().map(row_to_column).collect()
        })
        .await
    }

    async fn update_column(
        &self,
        column: &Column,
        expected: Revision,
    ) -> BoardRepositoryResult<()> {
        let row = to_new_column_row(column);
        let position = column.position();
        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardRepositoryError, _>(|tx| {
                let stored = board_columns::table
                    .filter(board_columns::id.eq(row.id))
                    .filter(board_columns::owner_id.eq(row.owner_id))
                    .select(board_columns::revision)
                    .for_update()
                    .first::<i64>(tx)
                    .optional()?;
                check_revision(EntityKind::Column, row.id, stored, expected)?;
                diesel::update(board_columns::table.filter(board_columns::id.eq(row.id)))
                    .set((
                        board_columns::name.eq(&row.name),
                        board_columns::position.eq(row.position),
                        board_columns::placement.eq(&row.placement),
                        board_columns::revision.eq(row.revision),
                        board_columns::updated_at.eq(row.updated_at),
                    ))
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                            if is_constraint(info.as_ref(), COLUMN_POSITION_INDEX) =>
                        {
                            position_taken(EntityKind::Board, row.board_id, position)
                        }
                        _ => BoardRepositoryError::persistence(err),
                    })?;
                Ok(())
            })
        })
        .await
    }

    async fn delete_column(&self, owner: OwnerId, id: ColumnId) -> BoardRepositoryResult<bool> {
        let column_id = id.into_inner();
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                board_columns::table
                    .filter(board_columns::id.eq(column_id))
                    .filter(board_columns::owner_id.eq(owner.into_inner())),
            )
            .execute(connection)
            .map_err(|err| map_delete_error(err, EntityKind::Column, column_id))?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn max_task_position(
        &self,
        owner: OwnerId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<Option<Position>> {
        self.run_blocking(move |connection| {
            let value = tasks::table
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .filter(tasks::column_id.eq(column_id.into_inner()))
                .select(max(tasks::position))
                .get_result::<Option<i64>>(connection)?;
            value.map(decode_position).transpose()
        })
        .await
    }

    async fn insert_task(&self, task: &Task) -> BoardRepositoryResult<()> {
        let record = to_task_record(task)?;
        let position = task.position();
        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardRepositoryError, _>(|tx| {
                lock_column(tx, &record)?;
                if record.placement == Placement::Appended.as_str()
                    && appended_task_exists(tx, &record)?
                {
                    return Err(position_taken(EntityKind::Column, record.column_id, position));
                }
                diesel::insert_into(tasks::table)
                    .values(&record)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                            if is_constraint(info.as_ref(), TASK_POSITION_INDEX) =>
                        {
                            position_taken(EntityKind::Column, record.column_id, position)
                        }
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            BoardRepositoryError::Duplicate {
                                entity: EntityKind::Task,
                                id: record.id,
                            }
                        }
                        _ => map_task_parent_error(err, &record),
                    })?;
                Ok(())
            })
        })
        .await
    }

    async fn find_task(&self, owner: OwnerId, id: TaskId) -> BoardRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_tasks(
        &self,
        owner: OwnerId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .filter(tasks::column_id.eq(column_id.into_inner()))
                .order((
                    tasks::position.asc(),
                    tasks::created_at.asc(),
                    tasks::id.asc(),
                ))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn update_task(&self, task: &Task, expected: Revision) -> BoardRepositoryResult<()> {
        let record = to_task_record(task)?;
        let position = task.position();
        self.run_blocking(move |connection| {
            connection.transaction::<_, BoardRepositoryError, _>(|tx| {
                let stored = tasks::table
                    .filter(tasks::id.eq(record.id))
                    .filter(tasks::owner_id.eq(record.owner_id))
                    .select(tasks::revision)
                    .for_update()
                    .first::<i64>(tx)
                    .optional()?;
                check_revision(EntityKind::Task, record.id, stored, expected)?;
                lock_column(tx, &record)?;
                if record.placement == Placement::Appended.as_str()
                    && appended_task_exists(tx, &record)?
                {
                    return Err(position_taken(EntityKind::Column, record.column_id, position));
                }
                diesel::update(tasks::table.filter(tasks::id.eq(record.id)))
                    .set(&record)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                            if is_constraint(info.as_ref(), TASK_POSITION_INDEX) =>
                        {
                            position_taken(EntityKind::Column, record.column_id, position)
                        }
                        _ => map_task_parent_error(err, &record),
                    })?;
                Ok(())
            })
        })
        .await
    }

    async fn delete_task(&self, owner: OwnerId, id: TaskId) -> BoardRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::owner_id.eq(owner.into_inner())),
            )
            .execute(connection)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn delete_tasks_in_column(
        &self,
        owner: OwnerId,
        column_id: ColumnId,
    ) -> BoardRepositoryResult<usize> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                tasks::table
                    .filter(tasks::owner_id.eq(owner.into_inner()))
                    .filter(tasks::column_id.eq(column_id.into_inner())),
            )
            .execute(connection)?;
            Ok(deleted)
        })
        .await
    }
}

fn check_revision(
    entity: EntityKind,
    id: Uuid,
    stored: Option<i64>,
    expected: Revision,
) -> BoardRepositoryResult<()> {
    match stored {
        None => Err(BoardRepositoryError::NotFound { entity, id }),
        Some(revision) if revision != expected.value() => {
            Err(BoardRepositoryError::RevisionMismatch { entity, id })
        }
        Some(_) => Ok(()),
    }
}

fn lock_board(
    connection: &mut PgConnection,
    owner_id: Uuid,
    board_id: Uuid,
) -> BoardRepositoryResult<()> {
    let locked = boards::table
        .filter(boards::id.eq(board_id))
        .filter(boards::owner_id.eq(owner_id))
        .select(boards::id)
        .for_update()
        .first::<Uuid>(connection)
        .optional()?;
    if locked.is_none() {
        return Err(BoardRepositoryError::ParentMissing {
            entity: EntityKind::Board,
            id: board_id,
        });
    }
    Ok(())
}

fn lock_column(connection: &mut PgConnection, record: &TaskRecord) -> BoardRepositoryResult<()> {
    let locked = board_columns::table
        .filter(board_columns::id.eq(record.column_id))
        .filter(board_columns::board_id.eq(record.board_id))
        .filter(board_columns::owner_id.eq(record.owner_id))
        .select(board_columns::id)
        .for_update()
        .first::<Uuid>(connection)
        .optional()?;
    if locked.is_none() {
        return Err(BoardRepositoryError::ParentMissing {
            entity: EntityKind::Column,
            id: record.column_id,
        });
    }
    Ok(())
}

fn appended_column_exists(
    connection: &mut PgConnection,
    row: &NewColumnRow,
) -> BoardRepositoryResult<bool> {
    let existing = board_columns::table
        .filter(board_columns::board_id.eq(row.board_id))
        .filter(board_columns::position.eq(row.position))
        .filter(board_columns::placement.eq(Placement::Appended.as_str()))
        .filter(board_columns::id.ne(row.id))
        .select(board_columns::id)
        .first::<Uuid>(connection)
        .optional()?;
    Ok(existing.is_some())
}

fn appended_task_exists(
    connection: &mut PgConnection,
    record: &TaskRecord,
) -> BoardRepositoryResult<bool> {
    let existing = tasks::table
        .filter(tasks::column_id.eq(record.column_id))
        .filter(tasks::position.eq(record.position))
        .filter(tasks::placement.eq(Placement::Appended.as_str()))
        .filter(tasks::id.ne(record.id))
        .select(tasks::id)
        .first::<Uuid>(connection)
        .optional()?;
    Ok(existing.is_some())
}

const fn position_taken(
    parent: EntityKind,
    parent_id: Uuid,
    position: Position,
) -> BoardRepositoryError {
    BoardRepositoryError::PositionTaken {
        parent,
        parent_id,
        position,
    }
}

fn map_delete_error(err: DieselError, entity: EntityKind, id: Uuid) -> BoardRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            BoardRepositoryError::HasDependents { entity, id }
        }
        _ => BoardRepositoryError::persistence(err),
    }
}

fn map_task_parent_error(err: DieselError, record: &TaskRecord) -> BoardRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            BoardRepositoryError::ParentMissing {
                entity: EntityKind::Column,
                id: record.column_id,
            }
        }
        _ => BoardRepositoryError::persistence(err),
    }
}

fn is_constraint(info: &dyn DatabaseErrorInformation, name: &str) -> bool {
    info.constraint_name()
        .is_some_and(|constraint| constraint == name)
}

fn to_new_column_row(column: &Column) -> NewColumnRow {
    NewColumnRow {
        id: column.id().into_inner(),
        owner_id: column.owner_id().into_inner(),
        board_id: column.board_id().into_inner(),
        name: column.name().as_str().to_owned(),
        position: column.position().value(),
        placement: column.placement().as_str().to_owned(),
        revision: column.revision().value(),
        created_at: column.created_at(),
        updated_at: column.updated_at(),
    }
}

fn to_task_record(task: &Task) -> BoardRepositoryResult<TaskRecord> {
    let subtasks =
        serde_json::to_value(task.subtasks()).map_err(BoardRepositoryError::persistence)?;
    Ok(TaskRecord {
        id: task.id().into_inner(),
        owner_id: task.owner_id().into_inner(),
        board_id: task.board_id().into_inner(),
        column_id: task.column_id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().as_str().to_owned(),
        position: task.position().value(),
        placement: task.placement().as_str().to_owned(),
        subtasks,
        revision: task.revision().value(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn decode_position(value: i64) -> BoardRepositoryResult<Position> {
    Position::new(value).map_err(BoardRepositoryError::invalid_persisted_data)
}

fn decode_placement(value: &str) -> BoardRepositoryResult<Placement> {
    Placement::try_from(value).map_err(BoardRepositoryError::invalid_persisted_data)
}

fn row_to_board(row: BoardRow) -> BoardRepositoryResult<Board> {
    let name = BoardName::new(row.name).map_err(BoardRepositoryError::invalid_persisted_data)?;
    Ok(Board::from_persisted(PersistedBoardData {
        id: BoardId::from_uuid(row.id),
        owner_id: OwnerId::from_uuid(row.owner_id),
        name,
        revision: Revision::from_value(row.revision),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_column(row: ColumnRow) -> BoardRepositoryResult<Column> {
    let name = ColumnName::new(row.name).map_err(BoardRepositoryError::invalid_persisted_data)?;
    Ok(Column::from_persisted(PersistedColumnData {
        id: ColumnId::from_uuid(row.id),
        owner_id: OwnerId::from_uuid(row.owner_id),
        board_id: BoardId::from_uuid(row.board_id),
        name,
        position: decode_position(row.position)?,
        placement: decode_placement(&row.placement)?,
        revision: Revision::from_value(row.revision),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_task(row: TaskRow) -> BoardRepositoryResult<Task> {
    let TaskRow {
        id,
        owner_id,
        board_id,
        column_id,
        title: persisted_title,
        description: persisted_description,
        position,
        placement,
        subtasks: persisted_subtasks,
        revision,
        created_at,
        updated_at,
    } = row;

    let title =
        TaskTitle::new(persisted_title).map_err(BoardRepositoryError::invalid_persisted_data)?;
    let description = TaskDescription::new(persisted_description)
        .map_err(BoardRepositoryError::invalid_persisted_data)?;
    let subtasks = serde_json::from_value::<Vec<Subtask>>(persisted_subtasks)
        .map_err(BoardRepositoryError::invalid_persisted_data)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner_id: OwnerId::from_uuid(owner_id),
        board_id: BoardId::from_uuid(board_id),
        column_id: ColumnId::from_uuid(column_id),
        title,
        description,
        position: decode_position(position)?,
        placement: decode_placement(&placement)?,
        subtasks,
        revision: Revision::from_value(revision),
        created_at,
        updated_at,
    }))
}
