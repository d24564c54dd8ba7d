//! Shared builders for board unit tests.

use crate::board::domain::{
    Board, BoardId, BoardName, Column, ColumnId, ColumnName, OwnerId, Position, Slot, Task,
    TaskDescription, TaskDraft, TaskTitle,
};
use mockable::DefaultClock;
use uuid::Uuid;

pub fn owner() -> OwnerId {
    OwnerId::from_uuid(Uuid::new_v4())
}

pub fn position(value: i64) -> Position {
    Position::new(value).expect("valid position")
}

pub fn board(owner: OwnerId, name: &str) -> Board {
    Board::new(owner, BoardName::new(name).expect("valid name"), &DefaultClock)
}

pub fn column(owner: OwnerId, board_id: BoardId, name: &str, at: i64) -> Column {
    Column::new(
        owner,
        board_id,
        ColumnName::new(name).expect("valid name"),
        Slot::appended(position(at)),
        &DefaultClock,
    )
}

pub fn draft(title: &str) -> TaskDraft {
    TaskDraft {
        title: TaskTitle::new(title).expect("valid title"),
        description: TaskDescription::default(),
        subtasks: Vec::new(),
    }
}

pub fn task(owner: OwnerId, board_id: BoardId, column_id: ColumnId, title: &str, at: i64) -> Task {
    Task::new(
        owner,
        board_id,
        column_id,
        draft(title),
        Slot::appended(position(at)),
        &DefaultClock,
    )
}
