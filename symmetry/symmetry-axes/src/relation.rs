//! Repeat relations: which repeats were superposed to obtain an axis.
//!
//! The relations are not used when composing transforms. They are kept so
//! that an external refinement step can superpose the same repeats again
//! and replace the axis with a better estimate.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{SymmetryError, SymmetryResult};

/// Two correspondence lists of repeat indices.
///
/// Superposing `first[i]` onto `second[i]` for every `i` produced the axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RepeatRelation {
    /// Repeats that are moved.
    pub first: Vec<usize>,
    /// Repeats they are superposed onto, matched by position.
    pub second: Vec<usize>,
}

impl RepeatRelation {
    /// Creates a relation from two correspondence lists.
    ///
    /// The lists are not checked here; see [`validate`](Self::validate).
    #[must_use]
    pub const fn new(first: Vec<usize>, second: Vec<usize>) -> Self {
        Self { first, second }
    }

    /// Checks that both lists have the same length.
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError::WrongSuperpositionFormat`] otherwise.
    pub fn validate(&self) -> SymmetryResult<()> {
        if self.first.len() != self.second.len() {
            return Err(SymmetryError::WrongSuperpositionFormat {
                lists: 2,
                lengths: vec![self.first.len(), self.second.len()],
            });
        }
        Ok(())
    }

    /// Number of superposed repeat pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.first.len()
    }

    /// Returns true if the relation names no repeat pair.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    /// Iterates over `(moved, target)` repeat pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.first.iter().copied().zip(self.second.iter().copied())
    }

    /// Every repeat index named by either list.
    pub fn repeats(&self) -> impl Iterator<Item = usize> + '_ {
        self.first.iter().chain(self.second.iter()).copied()
    }
}

impl TryFrom<Vec<Vec<usize>>> for RepeatRelation {
    type Error = SymmetryError;

    /// Accepts exactly two lists of equal length.
    fn try_from(lists: Vec<Vec<usize>>) -> SymmetryResult<Self> {
        let lengths: Vec<usize> = lists.iter().map(Vec::len).collect();
        let Ok([first, second]) = <[Vec<usize>; 2]>::try_from(lists) else {
            return Err(SymmetryError::WrongSuperpositionFormat {
                lists: lengths.len(),
                lengths,
            });
        };
        let relation = Self::new(first, second);
        relation.validate()?;
        Ok(relation)
    }
}

/// Per-axis repeat relations, indexed by axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RepeatRelationIndex {
    relations: Vec<Option<RepeatRelation>>,
}

impl RepeatRelationIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the relation of `axis`, replacing any previous one.
    pub fn insert(&mut self, axis: usize, relation: RepeatRelation) {
        if self.relations.len() <= axis {
            self.relations.resize(axis + 1, None);
        }
        self.relations[axis] = Some(relation);
    }

    /// The relation recorded for `axis`, if any.
    #[must_use]
    pub fn relation_for(&self, axis: usize) -> Option<&RepeatRelation> {
        self.relations.get(axis).and_then(Option::as_ref)
    }

    /// Number of axis slots, including those without a relation.
    #[cfg(feature = "serde")]
    pub(crate) fn slot_count(&self) -> usize {
        self.relations.len()
    }

    /// Recorded relations in axis order.
    #[cfg(feature = "serde")]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &RepeatRelation> {
        self.relations.iter().flatten()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_two_lists() {
        let relation = RepeatRelation::try_from(vec![vec![0, 1], vec![1, 2]]).unwrap();
        assert_eq!(relation.pairs().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
        assert_eq!(relation.repeats().max(), Some(2));
        assert_eq!(relation.len(), 2);
    }

    #[test]
    fn test_try_from_wrong_list_count() {
        for lists in [vec![], vec![vec![0]], vec![vec![0], vec![1], vec![2]]] {
            let err = RepeatRelation::try_from(lists).unwrap_err();
            assert!(matches!(err, SymmetryError::WrongSuperpositionFormat { .. }));
        }
    }

    #[test]
    fn test_unequal_lengths() {
        let err = RepeatRelation::try_from(vec![vec![0, 1], vec![2]]).unwrap_err();
        assert!(matches!(
            err,
            SymmetryError::WrongSuperpositionFormat { lists: 2, .. }
        ));
        assert!(RepeatRelation::new(vec![0], vec![]).validate().is_err());
    }

    #[test]
    fn test_index_last_write_wins() {
        let mut index = RepeatRelationIndex::new();
        assert!(index.relation_for(0).is_none());

        index.insert(1, RepeatRelation::new(vec![0], vec![1]));
        assert!(index.relation_for(0).is_none());
        assert_eq!(index.relation_for(1).unwrap().first, vec![0]);

        index.insert(1, RepeatRelation::new(vec![2], vec![3]));
        assert_eq!(index.relation_for(1).unwrap().first, vec![2]);
    }
}
