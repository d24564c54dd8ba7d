//! Request payloads accepted by [`super::KanbanService`].
//!
//! Payloads carry raw caller input. The service validates every field before
//! anything is written.

use crate::board::domain::{
    BoardDomainError, BoardName, ColumnName, Position, SubtaskDraft, TaskChanges,
    TaskDescription, TaskDraft, TaskTitle, sanitize_subtasks,
};

/// Request payload for creating a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBoardRequest {
    name: String,
    columns: Vec<String>,
}

impl CreateBoardRequest {
    /// Creates a request for an empty board.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Sets the initial column names, appended in the given order.
    #[must_use]
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub(super) fn validate(self) -> Result<(BoardName, Vec<ColumnName>), BoardDomainError> {
        let name = BoardName::new(self.name)?;
        let columns = self
            .columns
            .into_iter()
            .map(ColumnName::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((name, columns))
    }
}

/// Request payload for creating a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateColumnRequest {
    name: String,
    position: Option<i64>,
}

impl CreateColumnRequest {
    /// Creates a request for a column appended after its siblings.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: None,
        }
    }

    /// Places the column at an explicit position.
    #[must_use]
    pub const fn with_position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }

    pub(super) fn validate(self) -> Result<(ColumnName, Option<Position>), BoardDomainError> {
        let name = ColumnName::new(self.name)?;
        let position = self.position.map(Position::new).transpose()?;
        Ok((name, position))
    }
}

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    subtasks: Vec<SubtaskDraft>,
    position: Option<i64>,
}

impl CreateTaskRequest {
    /// Creates a request for a task appended after its siblings.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            subtasks: Vec::new(),
            position: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the checklist. Entries with blank titles are dropped.
    #[must_use]
    pub fn with_subtasks(mut self, subtasks: impl IntoIterator<Item = SubtaskDraft>) -> Self {
        self.subtasks = subtasks.into_iter().collect();
        self
    }

    /// Places the task at an explicit position.
    #[must_use]
    pub const fn with_position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }

    pub(super) fn validate(self) -> Result<(TaskDraft, Option<Position>), BoardDomainError> {
        let draft = TaskDraft {
            title: TaskTitle::new(self.title)?,
            description: TaskDescription::new(self.description.unwrap_or_default())?,
            subtasks: sanitize_subtasks(self.subtasks)?,
        };
        let position = self.position.map(Position::new).transpose()?;
        Ok((draft, position))
    }
}

/// Request payload for a partial task update.
///
/// Fields left unset keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    subtasks: Option<Vec<SubtaskDraft>>,
    position: Option<i64>,
}

impl UpdateTaskRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the checklist. Entries with blank titles are dropped.
    #[must_use]
    pub fn with_subtasks(mut self, subtasks: impl IntoIterator<Item = SubtaskDraft>) -> Self {
        self.subtasks = Some(subtasks.into_iter().collect());
        self
    }

    /// Moves the task to an explicit position within its column.
    #[must_use]
    pub const fn with_position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }

    pub(super) fn validate(self) -> Result<TaskChanges, BoardDomainError> {
        Ok(TaskChanges {
            title: self.title.map(TaskTitle::new).transpose()?,
            description: self.description.map(TaskDescription::new).transpose()?,
            subtasks: self.subtasks.map(sanitize_subtasks).transpose()?,
            position: self.position.map(Position::new).transpose()?,
        })
    }
}
