//! Read models assembling a board with its ordered descendants.

use super::{Board, Column, Task};
use serde::{Deserialize, Serialize};

/// A column with its tasks in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnView {
    /// The column record.
    pub column: Column,
    /// Tasks sorted by position, then creation time.
    pub tasks: Vec<Task>,
}

/// A board with its columns in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    /// The board record.
    pub board: Board,
    /// Columns sorted by position, then creation time.
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    /// Finds a column by name, returning the first match in presentation
    /// order.
    #[must_use]
    pub fn column_named(&self, name: &str) -> Option<&ColumnView> {
        self.columns
            .iter()
            .find(|view| view.column.name().as_str() == name)
    }
}
