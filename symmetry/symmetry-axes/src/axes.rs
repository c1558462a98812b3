//! The symmetry axes store: registry, repeat table and relations together.

use nalgebra::Point3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::compose::{repeat_transform, repeat_transforms};
use crate::config::SymmetryAxesConfig;
use crate::derive::{derived_axes, derived_axes_by_repeat};
use crate::equivalence::{AxisEquivalence, ScrewAxisEquivalence};
use crate::registry::{AxisRegistry, ElementaryAxis};
use crate::relation::{RepeatRelation, RepeatRelationIndex};
use crate::table::RepeatTransformTable;
use crate::{RigidTransform, SymmetryError, SymmetryResult};

/// All symmetry axes describing a structure made of repeats.
///
/// Elementary axes are registered from the most global to the most local,
/// together with how many times each one is applied to every repeat and
/// which repeats were superposed to obtain it. From this the store composes
/// the transform of each repeat and derives one symmetry axis per repeat.
///
/// Mutations take `&mut self` and validate everything before touching any
/// state, so a failed [`add_axis`](Self::add_axis) leaves the store as it
/// was. Share it across threads behind a `RwLock`.
///
/// # Example
///
/// ```
/// use symmetry_axes::{RepeatRelation, RigidTransform, SymmetryAxes};
/// use nalgebra::Vector3;
/// use std::f64::consts::PI;
///
/// // D2: a two-fold about Z splits the structure, a two-fold about X splits each half.
/// let mut axes = SymmetryAxes::new();
/// let z = RigidTransform::from_axis_angle(&Vector3::z_axis(), PI);
/// let x = RigidTransform::from_axis_angle(&Vector3::x_axis(), PI);
///
/// axes.add_axis(z, RepeatRelation::new(vec![0, 2], vec![1, 3]), &[0, 1, 0, 1], 2)?;
/// axes.add_axis(x, RepeatRelation::new(vec![0, 1], vec![2, 3]), &[0, 0, 1, 1], 2)?;
///
/// assert_eq!(axes.repeat_count(), 4);
/// assert_eq!(axes.repeat_transform(0)?, RigidTransform::identity());
/// assert_eq!(axes.derived_axes().len(), 3);
/// # Ok::<(), symmetry_axes::SymmetryError>(())
/// ```
///
/// With the `serde` feature the store round-trips without its equivalence
/// strategy, which is rebuilt with `E::default()`. Deserialization rejects
/// state that [`add_axis`](Self::add_axis) could not have produced.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SymmetryAxes<E = ScrewAxisEquivalence> {
    registry: AxisRegistry,
    table: RepeatTransformTable,
    relations: RepeatRelationIndex,
    config: SymmetryAxesConfig,
    #[cfg_attr(feature = "serde", serde(skip))]
    equivalence: E,
}

/// Unchecked wire form of [`SymmetryAxes`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawSymmetryAxes {
    registry: AxisRegistry,
    table: RepeatTransformTable,
    relations: RepeatRelationIndex,
    config: SymmetryAxesConfig,
}

#[cfg(feature = "serde")]
impl RawSymmetryAxes {
    fn check(&self) -> SymmetryResult<()> {
        let axis_count = self.registry.len();
        if self.table.axis_count() != axis_count {
            return Err(SymmetryError::InconsistentShape(format!(
                "{axis_count} axes but {} table columns",
                self.table.axis_count()
            )));
        }
        if self.relations.slot_count() > axis_count {
            return Err(SymmetryError::InconsistentShape(format!(
                "{} relation slots for {axis_count} axes",
                self.relations.slot_count()
            )));
        }

        let repeat_count = self.table.repeat_count();
        for relation in self.relations.iter() {
            relation.validate()?;
            if let Some(index) = relation
                .repeats()
                .find(|&index| !self.config.repeat_bound.admits(index, repeat_count))
            {
                return Err(SymmetryError::RepeatOutOfBounds {
                    index,
                    repeat_count,
                });
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl<'de, E: Default> Deserialize<'de> for SymmetryAxes<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawSymmetryAxes::deserialize(deserializer)?;
        raw.check().map_err(serde::de::Error::custom)?;
        Ok(Self {
            registry: raw.registry,
            table: raw.table,
            relations: raw.relations,
            config: raw.config,
            equivalence: E::default(),
        })
    }
}

impl Default for SymmetryAxes {
    fn default() -> Self {
        Self::new()
    }
}

impl SymmetryAxes {
    /// Creates an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SymmetryAxesConfig::default())
    }

    /// Creates an empty store with the given configuration.
    #[must_use]
    pub fn with_config(config: SymmetryAxesConfig) -> Self {
        Self::with_equivalence(config, ScrewAxisEquivalence)
    }
}

impl<E: AxisEquivalence> SymmetryAxes<E> {
    /// Creates an empty store that deduplicates axes with `equivalence`.
    #[must_use]
    pub fn with_equivalence(config: SymmetryAxesConfig, equivalence: E) -> Self {
        Self {
            registry: AxisRegistry::new(),
            table: RepeatTransformTable::new(),
            relations: RepeatRelationIndex::new(),
            config,
            equivalence,
        }
    }

    /// Adds a new elementary axis and returns its index.
    ///
    /// * `transform` - the axis transform
    /// * `superposition` - repeats whose superposition produced the axis
    /// * `repeats` - how many times the axis applies to each repeat; repeats
    ///   beyond the end of the slice get zero
    /// * `division` - number of parts the axis divides its scope into
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError::WrongSuperpositionFormat`] if the relation
    /// lists differ in length, [`SymmetryError::DivisionTooSmall`] if
    /// `division < 2` and [`SymmetryError::RepeatOutOfBounds`] if the
    /// relation names a repeat outside the table. Nothing is modified when
    /// an error is returned.
    pub fn add_axis(
        &mut self,
        transform: RigidTransform,
        superposition: RepeatRelation,
        repeats: &[u32],
        division: u32,
    ) -> SymmetryResult<usize> {
        superposition.validate()?;
        AxisRegistry::validate_division(division)?;

        let repeat_count = self.table.repeat_count().max(repeats.len());
        if let Some(index) = superposition
            .repeats()
            .find(|&index| !self.config.repeat_bound.admits(index, repeat_count))
        {
            return Err(SymmetryError::RepeatOutOfBounds {
                index,
                repeat_count,
            });
        }

        let axis = self.registry.add(transform, division)?;
        self.table.ensure_repeat_count(repeats.len());
        self.table.fill_column(axis, repeats);
        self.relations.insert(axis, superposition);

        debug!(
            axis,
            division,
            repeats = self.table.repeat_count(),
            "Added symmetry axis"
        );
        Ok(axis)
    }

    /// Replaces the transform of an existing axis, e.g. after refinement.
    ///
    /// Division, repeat counts and relations are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError::AxisOutOfRange`] if `axis` was never assigned.
    pub fn update_axis(&mut self, axis: usize, transform: RigidTransform) -> SymmetryResult<()> {
        self.registry.update(axis, transform)?;
        debug!(axis, "Updated symmetry axis");
        Ok(())
    }

    /// Elementary axis transforms, most global first.
    #[must_use]
    pub fn elementary_axes(&self) -> &[RigidTransform] {
        self.registry.transforms()
    }

    /// Elementary axis with its division.
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError::AxisOutOfRange`] if `axis` was never assigned.
    pub fn elementary_axis(&self, axis: usize) -> SymmetryResult<ElementaryAxis> {
        self.registry.get(axis)
    }

    /// Division of an axis.
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError::AxisOutOfRange`] if `axis` was never assigned.
    pub fn division(&self, axis: usize) -> SymmetryResult<u32> {
        self.registry.get(axis).map(|a| a.division)
    }

    /// Divisions of all axes, aligned with [`elementary_axes`](Self::elementary_axes).
    #[must_use]
    pub fn divisions(&self) -> &[u32] {
        self.registry.divisions()
    }

    /// Number of elementary axes.
    #[must_use]
    pub fn axis_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of repeats known to the table.
    #[must_use]
    pub fn repeat_count(&self) -> usize {
        self.table.repeat_count()
    }

    /// How many times each axis applies to `repeat`.
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError::RepeatRowOutOfRange`] if the repeat has no row.
    pub fn repeat_counts(&self, repeat: usize) -> SymmetryResult<&[u32]> {
        self.table.row(repeat)
    }

    /// The superposition that produced `axis`, if recorded.
    #[must_use]
    pub fn repeat_relation(&self, axis: usize) -> Option<&RepeatRelation> {
        self.relations.relation_for(axis)
    }

    /// Transform that superposes `repeat` onto the reference frame.
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError::RepeatRowOutOfRange`] if the repeat has no row.
    pub fn repeat_transform(&self, repeat: usize) -> SymmetryResult<RigidTransform> {
        repeat_transform(&self.registry, &self.table, repeat)
    }

    /// Transforms of all repeats, in repeat order.
    #[must_use]
    pub fn repeat_transforms(&self) -> Vec<RigidTransform> {
        repeat_transforms(&self.registry, &self.table)
    }

    /// Moves the coordinates of `repeat` onto the reference frame.
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError::RepeatRowOutOfRange`] if the repeat has no row.
    pub fn superimpose_repeat(
        &self,
        repeat: usize,
        points: &[Point3<f64>],
    ) -> SymmetryResult<Vec<Point3<f64>>> {
        let transform = self.repeat_transform(repeat)?;
        Ok(points.iter().map(|p| transform.transform_point(p)).collect())
    }

    /// All symmetry axes of the structure.
    ///
    /// One axis per repeat that at least one elementary axis applies to, in
    /// repeat order. Equivalent axes are normalized to the value of the
    /// later one; none is removed.
    #[must_use]
    pub fn derived_axes(&self) -> Vec<RigidTransform> {
        derived_axes(
            &self.registry,
            &self.table,
            &self.equivalence,
            self.config.equivalence_tolerance,
        )
    }

    /// Symmetry axis of every repeat without deduplication.
    ///
    /// Index `i` belongs to repeat `i`; `None` marks repeats no axis applies to.
    #[must_use]
    pub fn derived_axes_by_repeat(&self) -> Vec<Option<RigidTransform>> {
        derived_axes_by_repeat(&self.registry, &self.table)
    }

    /// Configuration of this store.
    #[must_use]
    pub const fn config(&self) -> &SymmetryAxesConfig {
        &self.config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{ErrorKind, RepeatBound};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn quarter_z() -> RigidTransform {
        RigidTransform::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2)
    }

    #[test]
    fn test_add_axis_fills_table() {
        let mut axes = SymmetryAxes::new();
        let index = axes
            .add_axis(
                quarter_z(),
                RepeatRelation::new(vec![0, 1, 2], vec![1, 2, 3]),
                &[0, 1, 2, 3],
                4,
            )
            .unwrap();

        assert_eq!(index, 0);
        assert_eq!(axes.axis_count(), 1);
        assert_eq!(axes.repeat_count(), 4);
        assert_eq!(axes.repeat_counts(3).unwrap(), &[3]);
        assert_eq!(axes.division(0).unwrap(), 4);
        assert_eq!(axes.repeat_relation(0).unwrap().second, vec![1, 2, 3]);
    }

    #[test]
    fn test_later_axis_with_more_repeats_pads_rows() {
        let mut axes = SymmetryAxes::new();
        axes.add_axis(quarter_z(), RepeatRelation::new(vec![0], vec![1]), &[0, 1], 2)
            .unwrap();
        axes.add_axis(quarter_z(), RepeatRelation::new(vec![0], vec![3]), &[0, 0, 1, 1], 2)
            .unwrap();
        // Shorter repeats list than rows: trailing rows get zero
        axes.add_axis(quarter_z(), RepeatRelation::default(), &[1], 3)
            .unwrap();

        assert_eq!(axes.repeat_counts(0).unwrap(), &[0, 0, 1]);
        assert_eq!(axes.repeat_counts(1).unwrap(), &[1, 0, 0]);
        assert_eq!(axes.repeat_counts(3).unwrap(), &[0, 1, 0]);
        assert_eq!(axes.divisions(), &[2, 2, 3]);
    }

    #[test]
    fn test_repeat_bound_policies() {
        let mut strict = SymmetryAxes::new();
        let err = strict
            .add_axis(quarter_z(), RepeatRelation::new(vec![0], vec![2]), &[0, 1], 2)
            .unwrap_err();
        assert!(matches!(
            err,
            SymmetryError::RepeatOutOfBounds {
                index: 2,
                repeat_count: 2
            }
        ));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(strict.axis_count(), 0);
        assert_eq!(strict.repeat_count(), 0);

        let mut legacy = SymmetryAxes::with_config(
            SymmetryAxesConfig::default().with_repeat_bound(RepeatBound::OnePastEnd),
        );
        legacy
            .add_axis(quarter_z(), RepeatRelation::new(vec![0], vec![2]), &[0, 1], 2)
            .unwrap();
        assert!(legacy
            .add_axis(quarter_z(), RepeatRelation::new(vec![0], vec![3]), &[0, 1], 2)
            .is_err());
    }

    #[test]
    fn test_update_axis_out_of_range() {
        let mut axes = SymmetryAxes::new();
        let err = axes.update_axis(0, quarter_z()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
    }

    #[test]
    fn test_repeat_transform_out_of_range() {
        let axes = SymmetryAxes::new();
        let err = axes.repeat_transform(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
    }

    #[test]
    fn test_superimpose_repeat() {
        let mut axes = SymmetryAxes::new();
        axes.add_axis(
            quarter_z(),
            RepeatRelation::new(vec![0, 1, 2], vec![1, 2, 3]),
            &[0, 1, 2, 3],
            4,
        )
        .unwrap();

        let moved = axes
            .superimpose_repeat(2, &[Point3::new(1.0, 0.0, 0.0)])
            .unwrap();
        assert_relative_eq!(moved[0].x, -1.0, epsilon = 1e-10);
        assert_relative_eq!(moved[0].y, 0.0, epsilon = 1e-10);
        assert_eq!(axes.repeat_transforms().len(), 4);
    }

    #[test]
    fn test_custom_equivalence() {
        let never = |_: &RigidTransform, _: &RigidTransform, _: f64| false;
        let mut axes = SymmetryAxes::with_equivalence(SymmetryAxesConfig::default(), never);
        let half = RigidTransform::from_axis_angle(&Vector3::z_axis(), PI);
        axes.add_axis(half, RepeatRelation::new(vec![0], vec![1]), &[0, 1, 1], 2)
            .unwrap();

        // Identical axes survive untouched because nothing is equivalent
        assert_eq!(axes.derived_axes(), vec![half, half]);
        assert_eq!(axes.derived_axes_by_repeat(), vec![None, Some(half), Some(half)]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let mut axes = SymmetryAxes::new();
        axes.add_axis(quarter_z(), RepeatRelation::new(vec![0], vec![1]), &[0, 1], 2)
            .unwrap();

        let json = serde_json::to_string(&axes).unwrap();
        let parsed: SymmetryAxes = serde_json::from_str(&json).unwrap();

        assert_relative_eq!(
            parsed.elementary_axes()[0].to_matrix4(),
            quarter_z().to_matrix4(),
            epsilon = 1e-12
        );
        assert_eq!(parsed.repeat_counts(1).unwrap(), &[1]);
        assert_eq!(parsed.repeat_relation(0), axes.repeat_relation(0));
        assert_eq!(parsed.config(), axes.config());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_rejects_malformed_state() {
        let mut axes = SymmetryAxes::new();
        axes.add_axis(quarter_z(), RepeatRelation::new(vec![0], vec![1]), &[0, 1], 2)
            .unwrap();
        let valid = serde_json::to_value(&axes).unwrap();

        let rejected = |edit: fn(&mut serde_json::Value)| {
            let mut json = valid.clone();
            edit(&mut json);
            serde_json::from_value::<SymmetryAxes>(json).is_err()
        };

        // Divisions missing for the registered transform
        assert!(rejected(|json| json["registry"]["divisions"] = serde_json::json!([])));
        // Ragged rows
        assert!(rejected(|json| {
            json["table"]["rows"] = serde_json::json!([[0], []]);
            json["table"]["columns"] = serde_json::json!(5);
        }));
        // Column count disagrees with the registry
        assert!(rejected(|json| {
            json["table"]["rows"] = serde_json::json!([[0, 0], [1, 0]]);
            json["table"]["columns"] = serde_json::json!(2);
        }));
        // Relation names a repeat outside the table
        assert!(rejected(|json| {
            json["relations"]["relations"] = serde_json::json!([{"first": [0], "second": [7]}]);
        }));
        // Relation lists of different length
        assert!(rejected(|json| {
            json["relations"]["relations"] = serde_json::json!([{"first": [0, 1], "second": [1]}]);
        }));

        // The untouched document still loads and accepts new axes
        let mut parsed: SymmetryAxes = serde_json::from_value(valid).unwrap();
        parsed
            .add_axis(quarter_z(), RepeatRelation::new(vec![0], vec![2]), &[0, 0, 1], 2)
            .unwrap();
        assert_eq!(parsed.repeat_counts(1).unwrap(), &[1, 0]);
        assert_eq!(parsed.repeat_counts(2).unwrap(), &[0, 1]);
    }

    #[test]
    fn test_repeat_transforms_cover_every_row() {
        let mut axes = SymmetryAxes::new();
        axes.add_axis(quarter_z(), RepeatRelation::new(vec![0], vec![1]), &[0, 1, 2], 4)
            .unwrap();

        let transforms = axes.repeat_transforms();
        assert_eq!(transforms.len(), axes.repeat_count());
        assert_eq!(transforms[0], RigidTransform::identity());
        assert_relative_eq!(
            transforms[2].to_matrix4(),
            quarter_z().pow(2).to_matrix4(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_config_tolerance_is_used() {
        let a = RigidTransform::from_axis_angle(&Vector3::z_axis(), PI);
        let b = RigidTransform::from_axis_angle(&Vector3::z_axis(), PI - 0.05);

        for (tolerance, expect_merged) in [(0.1, true), (0.01, false)] {
            let mut axes = SymmetryAxes::with_config(
                SymmetryAxesConfig::default().with_equivalence_tolerance(tolerance),
            );
            axes.add_axis(a, RepeatRelation::new(vec![0], vec![1]), &[1, 0], 2)
                .unwrap();
            axes.add_axis(b, RepeatRelation::new(vec![1], vec![0]), &[0, 1], 2)
                .unwrap();

            let derived = axes.derived_axes();
            assert_eq!(derived.len(), 2);
            assert_eq!(derived[0] == derived[1], expect_merged);
        }
    }
}
