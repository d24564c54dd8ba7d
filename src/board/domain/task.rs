//! Task entity and its embedded subtask checklist.

use super::{
    BoardDomainError, BoardId, ColumnId, OwnerId, Placement, Position, Revision, Slot,
    SubtaskTitle, TaskDescription, TaskId, TaskTitle,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Checklist entry embedded in a task.
///
/// Subtasks have no identity beyond their index in the owning task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    title: SubtaskTitle,
    #[serde(default)]
    is_done: bool,
}

impl Subtask {
    /// Creates a subtask.
    #[must_use]
    pub const fn new(title: SubtaskTitle, is_done: bool) -> Self {
        Self { title, is_done }
    }

    /// Returns the subtask title.
    #[must_use]
    pub const fn title(&self) -> &SubtaskTitle {
        &self.title
    }

    /// Returns whether the subtask is checked off.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.is_done
    }
}

/// Unvalidated subtask input as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskDraft {
    /// Raw title text.
    pub title: String,
    /// Completion flag, `false` when omitted.
    #[serde(default)]
    pub is_done: bool,
}

impl SubtaskDraft {
    /// Creates an open subtask draft.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_done: false,
        }
    }

    /// Marks the draft as done.
    #[must_use]
    pub const fn done(mut self) -> Self {
        self.is_done = true;
        self
    }
}

/// Validates a caller-supplied checklist.
///
/// Entries whose title is blank are dropped. The rest keep their order.
///
/// # Errors
///
/// Returns [`BoardDomainError::TextTooLong`] when a remaining title exceeds
/// the subtask title limit.
pub fn sanitize_subtasks(drafts: Vec<SubtaskDraft>) -> Result<Vec<Subtask>, BoardDomainError> {
    drafts
        .into_iter()
        .filter(|draft| !draft.title.trim().is_empty())
        .map(|draft| SubtaskTitle::new(draft.title).map(|title| Subtask::new(title, draft.is_done)))
        .collect()
}

/// Validated content for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Task title.
    pub title: TaskTitle,
    /// Task description.
    pub description: TaskDescription,
    /// Ordered checklist.
    pub subtasks: Vec<Subtask>,
}

/// Validated partial update for an existing task.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// Replacement title.
    pub title: Option<TaskTitle>,
    /// Replacement description.
    pub description: Option<TaskDescription>,
    /// Replacement checklist.
    pub subtasks: Option<Vec<Subtask>>,
    /// Replacement position, stored as an explicit placement.
    pub position: Option<Position>,
}

impl TaskChanges {
    /// Returns `true` when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.subtasks.is_none()
            && self.position.is_none()
    }
}

/// Work item inside a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner_id: OwnerId,
    board_id: BoardId,
    column_id: ColumnId,
    title: TaskTitle,
    description: TaskDescription,
    position: Position,
    placement: Placement,
    subtasks: Vec<Subtask>,
    revision: Revision,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning principal.
    pub owner_id: OwnerId,
    /// Board containing the task's column.
    pub board_id: BoardId,
    /// Column containing the task.
    pub column_id: ColumnId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: TaskDescription,
    /// Persisted sibling position.
    pub position: Position,
    /// How the position was produced.
    pub placement: Placement,
    /// Persisted checklist.
    pub subtasks: Vec<Subtask>,
    /// Persisted revision.
    pub revision: Revision,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in `column_id` at the given slot.
    #[must_use]
    pub fn new(
        owner_id: OwnerId,
        board_id: BoardId,
        column_id: ColumnId,
        draft: TaskDraft,
        slot: Slot,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            owner_id,
            board_id,
            column_id,
            title: draft.title,
            description: draft.description,
            position: slot.position(),
            placement: slot.placement(),
            subtasks: draft.subtasks,
            revision: Revision::INITIAL,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner_id: data.owner_id,
            board_id: data.board_id,
            column_id: data.column_id,
            title: data.title,
            description: data.description,
            position: data.position,
            placement: data.placement,
            subtasks: data.subtasks,
            revision: data.revision,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning principal.
    #[must_use]
    pub const fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    /// Returns the board containing the task's column.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the column containing the task.
    #[must_use]
    pub const fn column_id(&self) -> ColumnId {
        self.column_id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the sibling position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns how the position was produced.
    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }

    /// Returns the ordered checklist.
    #[must_use]
    pub fn subtasks(&self) -> &[Subtask] {
        &self.subtasks
    }

    /// Returns the stored revision.
    #[must_use]
    pub const fn revision(&self) -> Revision {
        self.revision
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial update. An empty change set leaves the task as-is.
    pub fn apply(&mut self, changes: TaskChanges, clock: &impl Clock) {
        if changes.is_empty() {
            return;
        }
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(subtasks) = changes.subtasks {
            self.subtasks = subtasks;
        }
        if let Some(position) = changes.position {
            self.position = position;
            self.placement = Placement::Explicit;
        }
        self.touch(clock);
    }

    /// Moves the task under another column of the same board.
    ///
    /// The column and position change together.
    pub fn relocate(&mut self, column_id: ColumnId, slot: Slot, clock: &impl Clock) {
        self.column_id = column_id;
        self.position = slot.position();
        self.placement = slot.placement();
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.revision = self.revision.next();
        self.updated_at = clock.utc();
    }
}
