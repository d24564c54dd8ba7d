//! Sibling ordering values: positions, placements, and revisions.

use super::{BoardDomainError, ParsePlacementError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-parent ordering key for columns and tasks.
///
/// Positions are non-negative and only meaningful among siblings of the same
/// parent. Appended children start at [`Position::FIRST`].
///
/// # Examples
///
/// ```
/// use kanban_core::board::domain::Position;
///
/// let first = Position::after(None).expect("first position");
/// assert_eq!(first, Position::FIRST);
///
/// let next = Position::after(Some(first)).expect("second position");
/// assert_eq!(next.value(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Position(i64);

impl Position {
    /// Position assigned to the first appended child of an empty parent.
    pub const FIRST: Self = Self(1);

    /// Creates a validated position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::NegativePosition`] when `value` is below
    /// zero.
    pub const fn new(value: i64) -> Result<Self, BoardDomainError> {
        if value < 0 {
            return Err(BoardDomainError::NegativePosition(value));
        }
        Ok(Self(value))
    }

    /// Returns the append position following the current sibling maximum.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::PositionOverflow`] when `max` is already
    /// the largest representable position.
    pub fn after(max: Option<Self>) -> Result<Self, BoardDomainError> {
        let Some(current) = max else {
            return Ok(Self::FIRST);
        };
        current
            .0
            .checked_add(1)
            .map(Self)
            .ok_or(BoardDomainError::PositionOverflow(current.0))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Position {
    type Error = BoardDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Position> for i64 {
    fn from(value: Position) -> Self {
        value.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a position was produced.
///
/// Appended positions are computed by the ordering engine and must be unique
/// among appended siblings. Explicit positions come from the caller and are
/// stored as-is, duplicates included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Computed as one past the sibling maximum.
    Appended,
    /// Supplied by the caller.
    Explicit,
}

impl Placement {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Appended => "appended",
            Self::Explicit => "explicit",
        }
    }
}

impl TryFrom<&str> for Placement {
    type Error = ParsePlacementError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "appended" => Ok(Self::Appended),
            "explicit" => Ok(Self::Explicit),
            _ => Err(ParsePlacementError(value.to_owned())),
        }
    }
}

/// A position together with the way it was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    position: Position,
    placement: Placement,
}

impl Slot {
    /// Creates an engine-computed slot.
    #[must_use]
    pub const fn appended(position: Position) -> Self {
        Self {
            position,
            placement: Placement::Appended,
        }
    }

    /// Creates a caller-supplied slot.
    #[must_use]
    pub const fn explicit(position: Position) -> Self {
        Self {
            position,
            placement: Placement::Explicit,
        }
    }

    /// Returns the position.
    #[must_use]
    pub const fn position(self) -> Position {
        self.position
    }

    /// Returns the placement.
    #[must_use]
    pub const fn placement(self) -> Placement {
        self.placement
    }
}

/// Monotonic version of a stored record, bumped on every mutation.
///
/// Conditional updates compare the stored revision with the revision that
/// was read before the change was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(i64);

impl Revision {
    /// Revision of a freshly created record.
    pub const INITIAL: Self = Self(1);

    /// Wraps a persisted revision value.
    #[must_use]
    pub const fn from_value(value: i64) -> Self {
        Self(value)
    }

    /// Returns the following revision.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
