//! Composition of the net transform of a repeat.

use crate::registry::AxisRegistry;
use crate::table::RepeatTransformTable;
use crate::{RigidTransform, SymmetryResult};

/// Composes the transform that superposes `repeat` onto the reference frame.
///
/// Every axis with a non-zero count contributes its power, and the powers
/// are multiplied so that the most global axis acts on a point first and
/// the most local one last:
///
/// ```text
/// result = axis[k]^c[k] * ... * axis[1]^c[1] * axis[0]^c[0]
/// ```
///
/// # Errors
///
/// Returns [`SymmetryError::RepeatRowOutOfRange`](crate::SymmetryError::RepeatRowOutOfRange)
/// if the repeat has no row in the table.
pub fn repeat_transform(
    registry: &AxisRegistry,
    table: &RepeatTransformTable,
    repeat: usize,
) -> SymmetryResult<RigidTransform> {
    let counts = table.row(repeat)?;
    Ok(compose_row(registry.transforms(), counts))
}

/// Composes the transform of every repeat in the table, in repeat order.
///
/// Index `i` of the result belongs to repeat `i`.
#[must_use]
pub fn repeat_transforms(
    registry: &AxisRegistry,
    table: &RepeatTransformTable,
) -> Vec<RigidTransform> {
    table
        .rows()
        .map(|counts| compose_row(registry.transforms(), counts))
        .collect()
}

fn compose_row(axes: &[RigidTransform], counts: &[u32]) -> RigidTransform {
    let powers: Vec<RigidTransform> = axes
        .iter()
        .zip(counts)
        .filter(|&(_, &count)| count > 0)
        .map(|(axis, &count)| axis.pow(count))
        .collect();

    // Fold from the most local power back to the most global one.
    powers
        .iter()
        .rev()
        .fold(RigidTransform::identity(), |acc, power| acc.compose(power))
}
