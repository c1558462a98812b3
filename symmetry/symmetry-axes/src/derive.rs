//! Derivation of the symmetry axis of every repeat.
//!
//! Each repeat gets one composite axis built from the elementary axes it is
//! subject to, walking the hierarchy from the most local axis to the most
//! global one. Afterwards numerically equivalent axes are normalized to a
//! shared value.

use tracing::debug;

use crate::equivalence::AxisEquivalence;
use crate::registry::AxisRegistry;
use crate::table::RepeatTransformTable;
use crate::RigidTransform;

/// Derives the composite axis of one row of counts.
///
/// Returns `None` when no axis applies to the row.
fn derive_row_axis(axes: &[RigidTransform], counts: &[u32]) -> Option<RigidTransform> {
    let mut axis: Option<RigidTransform> = None;

    for (base, &reps) in axes.iter().zip(counts).rev() {
        let inverse = base.inverse();
        for _ in 0..reps {
            axis = Some(match axis {
                None => *base,
                // Conjugate the accumulated axis by this level's transform.
                Some(current) => base.compose(&current).compose(&inverse),
            });
        }
    }

    axis
}

/// Derives the symmetry axis of every repeat, aligned with the table rows.
///
/// Rows without any contribution yield `None`. No deduplication happens here.
pub fn derived_axes_by_repeat(
    registry: &AxisRegistry,
    table: &RepeatTransformTable,
) -> Vec<Option<RigidTransform>> {
    table
        .rows()
        .map(|counts| derive_row_axis(registry.transforms(), counts))
        .collect()
}

/// Normalizes equivalent axes in place.
///
/// For every pair `a < b`, if the two are equivalent then slot `a` takes the
/// value of slot `b`. Comparisons see the values written by earlier ones.
/// The length of `axes` never changes. Returns the number of overwrites.
pub fn deduplicate<E>(axes: &mut [RigidTransform], equivalence: &E, tolerance: f64) -> usize
where
    E: AxisEquivalence + ?Sized,
{
    let mut overwritten = 0;
    for a in 0..axes.len() {
        for b in (a + 1)..axes.len() {
            if equivalence.equivalent(&axes[a], &axes[b], tolerance) {
                axes[a] = axes[b];
                overwritten += 1;
            }
        }
    }
    overwritten
}

/// Derives all symmetry axes and normalizes equivalent ones.
///
/// Repeats without contribution are skipped, so the result holds one
/// candidate per contributing repeat in row order.
pub fn derived_axes<E>(
    registry: &AxisRegistry,
    table: &RepeatTransformTable,
    equivalence: &E,
    tolerance: f64,
) -> Vec<RigidTransform>
where
    E: AxisEquivalence + ?Sized,
{
    let mut axes: Vec<RigidTransform> = derived_axes_by_repeat(registry, table)
        .into_iter()
        .flatten()
        .collect();

    let overwritten = deduplicate(&mut axes, equivalence, tolerance);
    debug!(
        candidates = axes.len(),
        overwritten, tolerance, "Derived symmetry axes"
    );

    axes
}
