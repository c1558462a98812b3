//! Configuration and presets for symmetry axis bookkeeping.
//!
//! [`SymmetryAxesConfig`] controls the tolerance used when deduplicating
//! derived axes and how strictly repeat indices in a superposition are
//! bounds-checked.
//!
//! # Presets
//!
//! - [`SymmetryAxesConfig::default()`] - Strict repeat bounds, tolerance 0.1
//! - [`SymmetryAxesConfig::strict()`] - Same as default
//! - [`SymmetryAxesConfig::legacy()`] - Admits a repeat index equal to the row count
//!
//! # Example
//!
//! ```
//! use symmetry_axes::{RepeatBound, SymmetryAxesConfig};
//!
//! let config = SymmetryAxesConfig::default()
//!     .with_equivalence_tolerance(0.05)
//!     .with_repeat_bound(RepeatBound::OnePastEnd);
//! assert_eq!(config.repeat_bound, RepeatBound::OnePastEnd);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default tolerance for derived-axis equivalence.
pub const DEFAULT_EQUIVALENCE_TOLERANCE: f64 = 0.1;

/// Upper bound applied to repeat indices named in a superposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RepeatBound {
    /// Index must be strictly below the repeat row count.
    #[default]
    Strict,

    /// Index may equal the repeat row count.
    /// Kept for callers that relied on the looser historical check.
    OnePastEnd,
}

impl RepeatBound {
    /// Returns true if `index` passes this bound for a table of `repeat_count` rows.
    #[must_use]
    pub const fn admits(self, index: usize, repeat_count: usize) -> bool {
        match self {
            Self::Strict => index < repeat_count,
            Self::OnePastEnd => index <= repeat_count,
        }
    }
}

/// Configuration for a [`SymmetryAxes`](crate::SymmetryAxes) store.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SymmetryAxesConfig {
    /// Tolerance handed to the axis equivalence check during deduplication.
    pub equivalence_tolerance: f64,

    /// Bound applied to repeat indices in superpositions.
    pub repeat_bound: RepeatBound,
}

impl Default for SymmetryAxesConfig {
    fn default() -> Self {
        Self {
            equivalence_tolerance: DEFAULT_EQUIVALENCE_TOLERANCE,
            repeat_bound: RepeatBound::Strict,
        }
    }
}

impl SymmetryAxesConfig {
    /// Strict bounds checking with the default tolerance.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Historical behavior: a repeat index equal to the row count is accepted.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            repeat_bound: RepeatBound::OnePastEnd,
            ..Default::default()
        }
    }

    /// Set the equivalence tolerance.
    #[must_use]
    pub const fn with_equivalence_tolerance(mut self, tolerance: f64) -> Self {
        self.equivalence_tolerance = tolerance;
        self
    }

    /// Set the repeat bound policy.
    #[must_use]
    pub const fn with_repeat_bound(mut self, bound: RepeatBound) -> Self {
        self.repeat_bound = bound;
        self
    }
}
