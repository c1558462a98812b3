//! Append-only registry of elementary symmetry axes.
//!
//! Insertion order is the hierarchy order: index 0 is the most global axis,
//! later indices refine local regions of earlier divisions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{RigidTransform, SymmetryError, SymmetryResult};

/// Smallest number of parts an axis may divide its scope into.
pub const MIN_DIVISION: u32 = 2;

/// An elementary axis: a transform registered directly by a caller.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElementaryAxis {
    /// The rigid-body transform of the axis.
    pub transform: RigidTransform,
    /// Number of parts this axis divides its scope into (at least 2).
    pub division: u32,
}

/// Ordered arena of elementary axes.
///
/// Transforms and divisions are stored side by side so that the transforms
/// can be handed out as a contiguous slice.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawAxisRegistry"))]
pub struct AxisRegistry {
    transforms: Vec<RigidTransform>,
    divisions: Vec<u32>,
}

/// Unchecked wire form of [`AxisRegistry`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawAxisRegistry {
    transforms: Vec<RigidTransform>,
    divisions: Vec<u32>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawAxisRegistry> for AxisRegistry {
    type Error = SymmetryError;

    fn try_from(raw: RawAxisRegistry) -> SymmetryResult<Self> {
        if raw.transforms.len() != raw.divisions.len() {
            return Err(SymmetryError::InconsistentShape(format!(
                "{} transforms but {} divisions",
                raw.transforms.len(),
                raw.divisions.len()
            )));
        }
        for &division in &raw.divisions {
            Self::validate_division(division)?;
        }
        Ok(Self {
            transforms: raw.transforms,
            divisions: raw.divisions,
        })
    }
}

impl AxisRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that `division` is an acceptable axis division.
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError::DivisionTooSmall`] if `division < 2`.
    pub fn validate_division(division: u32) -> SymmetryResult<()> {
        if division < MIN_DIVISION {
            return Err(SymmetryError::DivisionTooSmall { division });
        }
        Ok(())
    }

    /// Appends an axis and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError::DivisionTooSmall`] if `division < 2`.
    pub fn add(&mut self, transform: RigidTransform, division: u32) -> SymmetryResult<usize> {
        Self::validate_division(division)?;
        let index = self.transforms.len();
        self.transforms.push(transform);
        self.divisions.push(division);
        Ok(index)
    }

    /// Replaces the transform of an existing axis. The division is kept.
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError::AxisOutOfRange`] if `index` was never assigned.
    pub fn update(&mut self, index: usize, transform: RigidTransform) -> SymmetryResult<()> {
        let axis_count = self.transforms.len();
        let slot = self
            .transforms
            .get_mut(index)
            .ok_or(SymmetryError::AxisOutOfRange { index, axis_count })?;
        *slot = transform;
        Ok(())
    }

    /// Number of registered axes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Returns true if no axis has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Returns the axis at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError::AxisOutOfRange`] if `index` was never assigned.
    pub fn get(&self, index: usize) -> SymmetryResult<ElementaryAxis> {
        match (self.transforms.get(index), self.divisions.get(index)) {
            (Some(&transform), Some(&division)) => Ok(ElementaryAxis {
                transform,
                division,
            }),
            _ => Err(SymmetryError::AxisOutOfRange {
                index,
                axis_count: self.transforms.len(),
            }),
        }
    }

    /// All axis transforms, most global first.
    #[must_use]
    pub fn transforms(&self) -> &[RigidTransform] {
        &self.transforms
    }

    /// All axis divisions, aligned with [`transforms`](Self::transforms).
    #[must_use]
    pub fn divisions(&self) -> &[u32] {
        &self.divisions
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use std::f64::consts::PI;

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_checks_divisions() {
        let mut registry = AxisRegistry::new();
        registry
            .add(RigidTransform::from_axis_angle(&Vector3::z_axis(), PI), 2)
            .unwrap();
        let mut json = serde_json::to_value(&registry).unwrap();

        let back: AxisRegistry = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back.divisions(), &[2]);

        json["divisions"] = serde_json::json!([]);
        let err = serde_json::from_value::<AxisRegistry>(json.clone()).unwrap_err();
        assert!(err.to_string().contains("inconsistent shape"));

        json["divisions"] = serde_json::json!([1]);
        let err = serde_json::from_value::<AxisRegistry>(json).unwrap_err();
        assert!(err.to_string().contains("division too small"));
    }

    #[test]
    fn test_add_returns_previous_size() {
        let mut registry = AxisRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.add(RigidTransform::identity(), 2).unwrap(), 0);
        assert_eq!(registry.add(RigidTransform::identity(), 3).unwrap(), 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.divisions(), &[2, 3]);
    }

    #[test]
    fn test_add_rejects_small_division() {
        let mut registry = AxisRegistry::new();
        for division in [0, 1] {
            let err = registry.add(RigidTransform::identity(), division).unwrap_err();
            assert!(matches!(err, SymmetryError::DivisionTooSmall { .. }));
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_update_keeps_division() {
        let mut registry = AxisRegistry::new();
        registry.add(RigidTransform::identity(), 4).unwrap();

        let refined = RigidTransform::from_axis_angle(&Vector3::z_axis(), PI / 2.0);
        registry.update(0, refined).unwrap();

        let axis = registry.get(0).unwrap();
        assert_eq!(axis.transform, refined);
        assert_eq!(axis.division, 4);
    }

    #[test]
    fn test_out_of_range() {
        let mut registry = AxisRegistry::new();
        assert!(matches!(
            registry.update(0, RigidTransform::identity()),
            Err(SymmetryError::AxisOutOfRange {
                index: 0,
                axis_count: 0
            })
        ));
        assert!(registry.get(3).is_err());
    }
}
