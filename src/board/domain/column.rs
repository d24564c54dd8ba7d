//! Column entity: an ordered container of tasks within a board.

use super::{BoardId, ColumnId, ColumnName, OwnerId, Placement, Position, Revision, Slot};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Ordered container of tasks within a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    id: ColumnId,
    owner_id: OwnerId,
    board_id: BoardId,
    name: ColumnName,
    position: Position,
    placement: Placement,
    revision: Revision,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedColumnData {
    /// Persisted column identifier.
    pub id: ColumnId,
    /// Owning principal.
    pub owner_id: OwnerId,
    /// Board containing the column.
    pub board_id: BoardId,
    /// Persisted column name.
    pub name: ColumnName,
    /// Persisted sibling position.
    pub position: Position,
    /// How the position was produced.
    pub placement: Placement,
    /// Persisted revision.
    pub revision: Revision,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Column {
    /// Creates a new column in `board_id` at the given slot.
    #[must_use]
    pub fn new(
        owner_id: OwnerId,
        board_id: BoardId,
        name: ColumnName,
        slot: Slot,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ColumnId::new(),
            owner_id,
            board_id,
            name,
            position: slot.position(),
            placement: slot.placement(),
            revision: Revision::INITIAL,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a column from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedColumnData) -> Self {
        Self {
            id: data.id,
            owner_id: data.owner_id,
            board_id: data.board_id,
            name: data.name,
            position: data.position,
            placement: data.placement,
            revision: data.revision,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> ColumnId {
        self.id
    }

    /// Returns the owning principal.
    #[must_use]
    pub const fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    /// Returns the board containing the column.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the column name.
    #[must_use]
    pub const fn name(&self) -> &ColumnName {
        &self.name
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

    /// Renames the column.
    pub fn rename(&mut self, name: ColumnName, clock: &impl Clock) {
        self.name = name;
        self.revision = self.revision.next();
        self.updated_at = clock.utc();
    }
}
