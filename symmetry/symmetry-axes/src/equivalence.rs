//! Numerical equivalence of symmetry axes.
//!
//! Deduplication of derived axes asks an [`AxisEquivalence`] whether two
//! transforms describe the same axis. The comparison is pluggable: any
//! closure with the right signature works, and [`ScrewAxisEquivalence`] is
//! provided as the default.
//!
//! # Example
//!
//! ```
//! use symmetry_axes::{AxisEquivalence, RigidTransform, ScrewAxisEquivalence};
//! use nalgebra::Vector3;
//! use std::f64::consts::PI;
//!
//! let a = RigidTransform::from_axis_angle(&Vector3::z_axis(), PI);
//! let b = RigidTransform::from_axis_angle(&-Vector3::z_axis(), PI);
//! assert!(ScrewAxisEquivalence.equivalent(&a, &b, 0.1));
//!
//! // A closure can stand in for the default comparator
//! let by_rotation_only =
//!     |a: &RigidTransform, b: &RigidTransform, tol: f64| a.rotation.angle_to(&b.rotation) < tol;
//! assert!(by_rotation_only.equivalent(&a, &b, 0.1));
//! ```

use std::f64::consts::PI;

use crate::RigidTransform;

/// Decides whether two transforms describe the same symmetry axis.
pub trait AxisEquivalence {
    /// Returns true if `a` and `b` are the same axis within `tolerance`.
    fn equivalent(&self, a: &RigidTransform, b: &RigidTransform, tolerance: f64) -> bool;
}

impl<F> AxisEquivalence for F
where
    F: Fn(&RigidTransform, &RigidTransform, f64) -> bool,
{
    fn equivalent(&self, a: &RigidTransform, b: &RigidTransform, tolerance: f64) -> bool {
        self(a, b, tolerance)
    }
}

/// Compares the screw axes of two transforms.
///
/// Two rotations are equivalent when their angles differ by less than the
/// tolerance, their directions agree (a half-turn about `u` also matches a
/// half-turn about `-u`) and the perpendicular distance between the two axis
/// lines is below the tolerance. A rotation by less than the tolerance counts
/// as no rotation, so transforms without one are compared by translation only
/// and never match a proper rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrewAxisEquivalence;

impl AxisEquivalence for ScrewAxisEquivalence {
    fn equivalent(&self, a: &RigidTransform, b: &RigidTransform, tolerance: f64) -> bool {
        let a_axis = a.screw_axis().filter(|s| s.angle >= tolerance);
        let b_axis = b.screw_axis().filter(|s| s.angle >= tolerance);
        match (a_axis, b_axis) {
            (None, None) => (a.translation - b.translation).norm() < tolerance,
            (Some(x), Some(y)) => {
                if (x.angle - y.angle).abs() >= tolerance {
                    return false;
                }

                let u = x.direction.into_inner();
                let v = y.direction.into_inner();
                let parallel = (u - v).norm() < tolerance;
                let half_turn_flip = PI - x.angle < tolerance && (u + v).norm() < tolerance;
                if !(parallel || half_turn_flip) {
                    return false;
                }

                let offset = y.point - x.point;
                let perpendicular = offset - u * offset.dot(&u);
                perpendicular.norm() < tolerance
            }
            _ => false,
        }
    }
}
