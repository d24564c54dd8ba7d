//! Error types for board domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing board domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// A required text field is empty after trimming.
    #[error("{field} must not be empty")]
    EmptyText {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A text field exceeds its character limit.
    #[error("{field} exceeds {max} character limit ({actual} characters)")]
    TextTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Maximum number of characters allowed.
        max: usize,
        /// Number of characters supplied.
        actual: usize,
    },

    /// A position value is negative.
    #[error("position must be zero or greater, got {0}")]
    NegativePosition(i64),

    /// The next sibling position cannot be represented.
    #[error("no position is available after {0}")]
    PositionOverflow(i64),
}

/// Error returned while parsing placements from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown placement: {0}")]
pub struct ParsePlacementError(pub String);
