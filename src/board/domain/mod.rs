//! Domain types for the board subsystem.
//!
//! Pure values and entities with no infrastructure dependencies. Every
//! constructor validates its input so persisted records always satisfy the
//! field limits.

mod board;
mod column;
mod error;
mod ids;
mod position;
mod task;
mod text;
mod view;

pub use board::{Board, PersistedBoardData};
pub use column::{Column, PersistedColumnData};
pub use error::{BoardDomainError, ParsePlacementError};
pub use ids::{BoardId, ColumnId, EntityKind, OwnerId, TaskId};
pub use position::{Placement, Position, Revision, Slot};
pub use task::{
    PersistedTaskData, Subtask, SubtaskDraft, Task, TaskChanges, TaskDraft, sanitize_subtasks,
};
pub use text::{
    BOARD_NAME_MAX_CHARS, BoardName, COLUMN_NAME_MAX_CHARS, ColumnName,
    SUBTASK_TITLE_MAX_CHARS, SubtaskTitle, TASK_DESCRIPTION_MAX_CHARS, TASK_TITLE_MAX_CHARS,
    TaskDescription, TaskTitle,
};
pub use view::{BoardView, ColumnView};
