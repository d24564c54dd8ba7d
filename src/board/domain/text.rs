//! Validated text values for board, column, task, and subtask fields.
//!
//! Limits are counted in characters. Names and titles are trimmed and must be
//! non-empty; descriptions keep their formatting and may be empty.

use super::BoardDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum characters in a board name.
pub const BOARD_NAME_MAX_CHARS: usize = 100;
/// Maximum characters in a column name.
pub const COLUMN_NAME_MAX_CHARS: usize = 100;
/// Maximum characters in a task title.
pub const TASK_TITLE_MAX_CHARS: usize = 200;
/// Maximum characters in a task description.
pub const TASK_DESCRIPTION_MAX_CHARS: usize = 1000;
/// Maximum characters in a subtask title.
pub const SUBTASK_TITLE_MAX_CHARS: usize = 200;

fn trimmed_label(
    raw: &str,
    field: &'static str,
    max: usize,
) -> Result<String, BoardDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BoardDomainError::EmptyText { field });
    }
    check_length(trimmed, field, max)?;
    Ok(trimmed.to_owned())
}

fn check_length(value: &str, field: &'static str, max: usize) -> Result<(), BoardDomainError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(BoardDomainError::TextTooLong { field, max, actual });
    }
    Ok(())
}

macro_rules! label_type {
    ($(#[$meta:meta])* $name:ident, $field:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a validated value from trimmed input.
            ///
            /// # Errors
            ///
            /// Returns [`BoardDomainError::EmptyText`] when the trimmed value
            /// is empty or [`BoardDomainError::TextTooLong`] when it exceeds
            /// the character limit.
            pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
                trimmed_label(&value.into(), $field, $max).map(Self)
            }

            /// Returns the value as `str`.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = BoardDomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

label_type!(
    /// Non-empty board name of at most 100 characters.
    BoardName,
    "board name",
    BOARD_NAME_MAX_CHARS
);

label_type!(
    /// Non-empty column name of at most 100 characters.
    ColumnName,
    "column name",
    COLUMN_NAME_MAX_CHARS
);

label_type!(
    /// Non-empty task title of at most 200 characters.
    TaskTitle,
    "task title",
    TASK_TITLE_MAX_CHARS
);

label_type!(
    /// Non-empty subtask title of at most 200 characters.
    SubtaskTitle,
    "subtask title",
    SUBTASK_TITLE_MAX_CHARS
);

/// Free-form task description of at most 1000 characters.
///
/// Empty descriptions are allowed and are the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Creates a validated description.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::TextTooLong`] when the description exceeds
    /// 1000 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        check_length(&raw, "task description", TASK_DESCRIPTION_MAX_CHARS)?;
        Ok(Self(raw))
    }

    /// Returns the description as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when no description has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<String> for TaskDescription {
    type Error = BoardDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskDescription> for String {
    fn from(value: TaskDescription) -> Self {
        value.0
    }
}

impl AsRef<str> for TaskDescription {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
