//! Diesel row models for board hierarchy persistence.

use super::schema::{board_columns, boards, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for board records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BoardRow {
    /// Board identifier.
    pub id: uuid::Uuid,
    /// Owning principal.
    pub owner_id: uuid::Uuid,
    /// Board name.
    pub name: String,
    /// Stored revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for board records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = boards)]
pub struct NewBoardRow {
    /// Board identifier.
    pub id: uuid::Uuid,
    /// Owning principal.
    pub owner_id: uuid::Uuid,
    /// Board name.
    pub name: String,
    /// Initial revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for column records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = board_columns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ColumnRow {
    /// Column identifier.
    pub id: uuid::Uuid,
    /// Owning principal.
    pub owner_id: uuid::Uuid,
    /// Parent board.
    pub board_id: uuid::Uuid,
    /// Column name.
    pub name: String,
    /// Sibling position.
    pub position: i64,
    /// Placement label.
    pub placement: String,
    /// Stored revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for column records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = board_columns)]
pub struct NewColumnRow {
    /// Column identifier.
    pub id: uuid::Uuid,
    /// Owning principal.
    pub owner_id: uuid::Uuid,
    /// Parent board.
    pub board_id: uuid::Uuid,
    /// Column name.
    pub name: String,
    /// Sibling position.
    pub position: i64,
    /// Placement label.
    pub placement: String,
    /// Initial revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning principal.
    pub owner_id: uuid::Uuid,
    /// Board of the parent column.
    pub board_id: uuid::Uuid,
    /// Parent column.
    pub column_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Sibling position.
    pub position: i64,
    /// Placement label.
    pub placement: String,
    /// Checklist JSON array.
    pub subtasks: Value,
    /// Stored revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and replace model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskRecord {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning principal.
    pub owner_id: uuid::Uuid,
    /// Board of the parent column.
    pub board_id: uuid::Uuid,
    /// Parent column.
    pub column_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Sibling position.
    pub position: i64,
    /// Placement label.
    pub placement: String,
    /// Checklist JSON array.
    pub subtasks: Value,
    /// Revision after the write.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
