//! Rigid-body transform used for elementary and derived symmetry axes.

use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, Unit, UnitQuaternion, Vector3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{SymmetryError, SymmetryResult};

/// Maximum deviation from orthonormality accepted by [`RigidTransform::from_matrix4`].
const RIGIDITY_TOLERANCE: f64 = 1e-6;

/// Rotations smaller than this (radians) are treated as having no axis.
const MIN_SCREW_ANGLE: f64 = 1e-9;

/// A rigid-body transformation: rotation followed by translation.
///
/// Behaves like a 4x4 homogeneous matrix whose upper-left block is a proper
/// rotation and whose last row is `[0, 0, 0, 1]`.
///
/// # Example
///
/// ```
/// use symmetry_axes::RigidTransform;
/// use nalgebra::{Point3, Vector3};
/// use std::f64::consts::PI;
///
/// // Two-fold axis along Z
/// let two_fold = RigidTransform::from_axis_angle(&Vector3::z_axis(), PI);
/// let p = two_fold.transform_point(&Point3::new(1.0, 0.0, 0.0));
/// assert!((p.x + 1.0).abs() < 1e-10);
///
/// // Applying it twice gives back the identity
/// assert!(two_fold.pow(2).is_identity(1e-10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RigidTransform {
    /// Rotation as a unit quaternion.
    pub rotation: UnitQuaternion<f64>,
    /// Translation vector.
    pub translation: Vector3<f64>,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// The screw axis of a rigid transform: the line it rotates about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrewAxis {
    /// Unit direction of the rotation axis.
    pub direction: Unit<Vector3<f64>>,
    /// Rotation angle in radians, in `(0, PI]`.
    pub angle: f64,
    /// Point on the axis closest to the origin.
    pub point: Point3<f64>,
    /// Translation along the axis direction.
    pub screw_translation: f64,
}

impl RigidTransform {
    /// Creates a new rigid transform with the given rotation and translation.
    #[must_use]
    pub const fn new(rotation: UnitQuaternion<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Creates an identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Creates a transform with only translation.
    #[must_use]
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation,
        }
    }

    /// Creates a transform with only rotation.
    #[must_use]
    pub fn from_rotation(rotation: UnitQuaternion<f64>) -> Self {
        Self {
            rotation,
            translation: Vector3::zeros(),
        }
    }

    /// Creates a rotation of `angle` radians about `axis` through the origin.
    #[must_use]
    pub fn from_axis_angle(axis: &Unit<Vector3<f64>>, angle: f64) -> Self {
        Self::from_rotation(UnitQuaternion::from_axis_angle(axis, angle))
    }

    /// Builds a transform from a 4x4 homogeneous matrix.
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError::InvalidTransform`] if the last row is not
    /// `[0, 0, 0, 1]` or the upper-left block is not a proper rotation.
    pub fn from_matrix4(matrix: &Matrix4<f64>) -> SymmetryResult<Self> {
        let last_row = matrix.fixed_view::<1, 4>(3, 0);
        let expected = [0.0, 0.0, 0.0, 1.0];
        if last_row
            .iter()
            .zip(expected.iter())
            .any(|(a, b)| (a - b).abs() > RIGIDITY_TOLERANCE)
        {
            return Err(SymmetryError::InvalidTransform(
                "last row must be [0, 0, 0, 1]".to_string(),
            ));
        }

        let block: Matrix3<f64> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let orthogonality = (block.transpose() * block - Matrix3::identity()).norm();
        if orthogonality > RIGIDITY_TOLERANCE {
            return Err(SymmetryError::InvalidTransform(format!(
                "rotation block is not orthonormal (deviation {orthogonality:.3e})"
            )));
        }
        if block.determinant() <= 0.0 {
            return Err(SymmetryError::InvalidTransform(
                "rotation block is a reflection".to_string(),
            ));
        }

        let rotation =
            UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(block));
        let translation = Vector3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);
        Ok(Self::new(rotation, translation))
    }

    /// Transforms a 3D point (rotate, then translate).
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * point.coords + self.translation)
    }

    /// Transforms a 3D vector (direction). Vectors are rotated but not translated.
    #[must_use]
    pub fn transform_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * vector
    }

    /// Composes this transform with another (self * other).
    ///
    /// The result applies `other` first, then `self`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            rotation: self.rotation * other.rotation,
            translation: self.translation + self.rotation * other.translation,
        }
    }

    /// Computes the inverse of this transform.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        Self {
            rotation: inv_rotation,
            translation: inv_rotation * -self.translation,
        }
    }

    /// Applies this transform to itself `n` times.
    ///
    /// `pow(0)` is the identity and `pow(1)` is the transform unchanged.
    /// Uses square-and-multiply, so the cost is logarithmic in `n`.
    #[must_use]
    pub fn pow(&self, n: u32) -> Self {
        let mut result: Option<Self> = None;
        let mut base = *self;
        let mut remaining = n;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = Some(result.map_or(base, |acc| acc.compose(&base)));
            }
            remaining >>= 1;
            if remaining > 0 {
                base = base.compose(&base);
            }
        }
        result.unwrap_or_else(Self::identity)
    }

    /// Converts to a 4x4 homogeneous transformation matrix.
    #[must_use]
    pub fn to_matrix4(&self) -> Matrix4<f64> {
        let mut mat = Matrix4::identity();
        mat.fixed_view_mut::<3, 3>(0, 0)
            .copy_from(self.rotation.to_rotation_matrix().matrix());
        mat.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation);
        mat
    }

    /// Returns the screw axis of this transform.
    ///
    /// Returns `None` for transforms without a rotational component
    /// (identity or pure translation).
    #[must_use]
    pub fn screw_axis(&self) -> Option<ScrewAxis> {
        let (direction, angle) = self.rotation.axis_angle()?;
        if angle < MIN_SCREW_ANGLE {
            return None;
        }
        let u = direction.into_inner();

        let screw_translation = self.translation.dot(&u);
        let perpendicular = self.translation - u * screw_translation;

        // Solve (I - R) p = t_perp with p orthogonal to the axis.
        let cot_half = 1.0 / (angle / 2.0).tan();
        let point = (perpendicular + u.cross(&perpendicular) * cot_half) / 2.0;

        Some(ScrewAxis {
            direction,
            angle,
            point: Point3::from(point),
            screw_translation,
        })
    }

    /// Returns true if this transform is approximately the identity.
    #[must_use]
    pub fn is_identity(&self, epsilon: f64) -> bool {
        self.rotation.angle().abs() < epsilon && self.translation.norm() < epsilon
    }
}
