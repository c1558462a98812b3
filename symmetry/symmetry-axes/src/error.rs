//! Error types for symmetry axis bookkeeping.

use thiserror::Error;

/// Coarse classification of a [`SymmetryError`].
///
/// Every error is a caller contract violation; the kind tells whether the
/// input was malformed or referred to something that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed argument (superposition shape, division, transform).
    InvalidArgument,
    /// Lookup or update of an axis or repeat that does not exist.
    IndexOutOfRange,
}

/// Errors that can occur while building or querying symmetry axes.
#[derive(Debug, Error)]
pub enum SymmetryError {
    /// The superposition is not two correspondence lists of equal length.
    #[error("wrong superposition format: expected 2 lists of equal length, got {lists} lists with lengths {lengths:?}")]
    WrongSuperpositionFormat {
        /// Number of lists supplied.
        lists: usize,
        /// Length of every supplied list.
        lengths: Vec<usize>,
    },

    /// The axis division is below the minimum of 2.
    #[error("division too small: a symmetry axis divides its scope in at least 2 parts, got {division}")]
    DivisionTooSmall {
        /// The rejected division.
        division: u32,
    },

    /// A repeat index in a superposition does not name a repeat row.
    #[error("repeat index {index} in superposition out of bounds for {repeat_count} repeats")]
    RepeatOutOfBounds {
        /// The offending repeat index.
        index: usize,
        /// Number of repeat rows the table would hold after the insertion.
        repeat_count: usize,
    },

    /// A matrix does not describe a rigid-body transform.
    #[error("invalid transform: {0}")]
    InvalidTransform(String),

    /// Stored state breaks the shape invariants (e.g. rows shorter than the axis count).
    #[error("inconsistent shape: {0}")]
    InconsistentShape(String),

    /// Axis index was never assigned.
    #[error("axis index {index} out of range for {axis_count} axes")]
    AxisOutOfRange {
        /// The requested axis index.
        index: usize,
        /// Number of registered axes.
        axis_count: usize,
    },

    /// Repeat index has no row in the transform table.
    #[error("repeat index {index} out of range for {repeat_count} repeats")]
    RepeatRowOutOfRange {
        /// The requested repeat index.
        index: usize,
        /// Number of repeat rows.
        repeat_count: usize,
    },
}

impl SymmetryError {
    /// Returns the taxonomy bucket this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::WrongSuperpositionFormat { .. }
            | Self::DivisionTooSmall { .. }
            | Self::RepeatOutOfBounds { .. }
            | Self::InvalidTransform(_)
            | Self::InconsistentShape(_) => ErrorKind::InvalidArgument,
            Self::AxisOutOfRange { .. } | Self::RepeatRowOutOfRange { .. } => {
                ErrorKind::IndexOutOfRange
            }
        }
    }
}

/// Result type for symmetry axis operations.
pub type SymmetryResult<T> = Result<T, SymmetryError>;
