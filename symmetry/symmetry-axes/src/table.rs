//! Table of how many times each axis is applied to each repeat.
//!
//! Rows are structural repeats, columns are axes. The table grows in both
//! directions and every cell that was never set reads as zero.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{SymmetryError, SymmetryResult};

/// Dense `repeats x axes` table of application counts.
///
/// Deserialization rejects rows whose length differs from the column count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawRepeatTransformTable"))]
pub struct RepeatTransformTable {
    rows: Vec<Vec<u32>>,
    columns: usize,
}

/// Unchecked wire form of [`RepeatTransformTable`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawRepeatTransformTable {
    rows: Vec<Vec<u32>>,
    columns: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRepeatTransformTable> for RepeatTransformTable {
    type Error = SymmetryError;

    fn try_from(raw: RawRepeatTransformTable) -> SymmetryResult<Self> {
        if let Some((repeat, row)) = raw
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != raw.columns)
        {
            return Err(SymmetryError::InconsistentShape(format!(
                "row {repeat} has {} counts for {} axes",
                row.len(),
                raw.columns
            )));
        }
        Ok(Self {
            rows: raw.rows,
            columns: raw.columns,
        })
    }
}

impl RepeatTransformTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of repeat rows.
    #[must_use]
    pub fn repeat_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of axis columns.
    #[must_use]
    pub const fn axis_count(&self) -> usize {
        self.columns
    }

    /// Grows the table to at least `n` rows, zero-filled across all columns.
    pub fn ensure_repeat_count(&mut self, n: usize) {
        let columns = self.columns;
        if self.rows.len() < n {
            self.rows.resize_with(n, || vec![0; columns]);
        }
    }

    /// Appends zero columns to every row until rows are `to` long.
    ///
    /// Never shrinks the table.
    pub fn grow_columns(&mut self, to: usize) {
        if to <= self.columns {
            return;
        }
        for row in &mut self.rows {
            row.resize(to, 0);
        }
        self.columns = to;
    }

    /// Sets the application count of `axis` for `repeat`.
    ///
    /// # Errors
    ///
    /// Returns an index error if the cell lies outside the table.
    pub fn set(&mut self, repeat: usize, axis: usize, count: u32) -> SymmetryResult<()> {
        let columns = self.columns;
        let repeat_count = self.rows.len();
        let row = self
            .rows
            .get_mut(repeat)
            .ok_or(SymmetryError::RepeatRowOutOfRange {
                index: repeat,
                repeat_count,
            })?;
        let cell = row.get_mut(axis).ok_or(SymmetryError::AxisOutOfRange {
            index: axis,
            axis_count: columns,
        })?;
        *cell = count;
        Ok(())
    }

    /// Writes the counts of `axis` down every row, zero past the end of `counts`.
    ///
    /// Columns are grown to cover `axis` first, so this cannot fail.
    pub fn fill_column(&mut self, axis: usize, counts: &[u32]) {
        self.grow_columns(axis + 1);
        for (repeat, row) in self.rows.iter_mut().enumerate() {
            row[axis] = counts.get(repeat).copied().unwrap_or(0);
        }
    }

    /// Application count of `axis` for `repeat`; zero outside the table.
    #[must_use]
    pub fn get(&self, repeat: usize, axis: usize) -> u32 {
        self.rows
            .get(repeat)
            .and_then(|row| row.get(axis))
            .copied()
            .unwrap_or(0)
    }

    /// The counts of one repeat, one per axis.
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError::RepeatRowOutOfRange`] if the repeat has no row.
    pub fn row(&self, repeat: usize) -> SymmetryResult<&[u32]> {
        self.rows
            .get(repeat)
            .map(Vec::as_slice)
            .ok_or(SymmetryError::RepeatRowOutOfRange {
                index: repeat,
                repeat_count: self.rows.len(),
            })
    }

    /// Iterates over all rows in repeat order.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.rows.iter().map(Vec::as_slice)
    }
}
