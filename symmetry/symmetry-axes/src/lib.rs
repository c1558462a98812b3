//! Hierarchical symmetry axes of structures made of repeats.
//!
//! A symmetric structure (a multi-subunit assembly, a protein with internal
//! repeats) is described by a few *elementary axes*: rigid-body transforms
//! ordered from the most global to the most local. For every repeat the
//! crate records how many times each axis applies to it, and from that it
//! answers two questions:
//!
//! - **Repeat transform** - which transform superposes a repeat onto the
//!   reference frame ([`SymmetryAxes::repeat_transform`])
//! - **Symmetry axes** - the composite axis of every repeat, with numerically
//!   equivalent axes normalized to one value ([`SymmetryAxes::derived_axes`])
//!
//! The crate does not discover symmetry. Axis transforms come from an
//! external alignment step and are only stored, composed and deduplicated.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with zero Bevy dependencies.
//!
//! # Quick Start
//!
//! ```
//! use symmetry_axes::{RepeatRelation, RigidTransform, SymmetryAxes};
//! use nalgebra::Vector3;
//! use std::f64::consts::PI;
//!
//! let mut axes = SymmetryAxes::new();
//!
//! // Global two-fold splits four repeats in two halves
//! let global = RigidTransform::from_axis_angle(&Vector3::z_axis(), PI);
//! axes.add_axis(global, RepeatRelation::new(vec![0, 1], vec![2, 3]), &[0, 0, 1, 1], 2)?;
//!
//! // Local two-fold inside each half
//! let local = RigidTransform::from_axis_angle(&Vector3::x_axis(), PI);
//! axes.add_axis(local, RepeatRelation::new(vec![0, 2], vec![1, 3]), &[0, 1, 0, 1], 2)?;
//!
//! // Repeat 3 is moved by the global axis first, then by the local one
//! let t = axes.repeat_transform(3)?;
//! assert!(!t.is_identity(1e-10));
//!
//! // Refine an axis after a better superposition was computed
//! axes.update_axis(1, local)?;
//! # Ok::<(), symmetry_axes::SymmetryError>(())
//! ```
//!
//! # Axis Equivalence
//!
//! Deduplication uses [`ScrewAxisEquivalence`] unless another
//! [`AxisEquivalence`] (any closure with the right signature) is supplied
//! through [`SymmetryAxes::with_equivalence`]. The tolerance comes from
//! [`SymmetryAxesConfig::equivalence_tolerance`].

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod axes;
mod compose;
mod config;
mod derive;
mod equivalence;
mod error;
mod registry;
mod relation;
mod table;
mod transform;

pub use axes::SymmetryAxes;
pub use compose::{repeat_transform, repeat_transforms};
pub use config::{DEFAULT_EQUIVALENCE_TOLERANCE, RepeatBound, SymmetryAxesConfig};
pub use derive::{deduplicate, derived_axes, derived_axes_by_repeat};
pub use equivalence::{AxisEquivalence, ScrewAxisEquivalence};
pub use error::{ErrorKind, SymmetryError, SymmetryResult};
pub use registry::{AxisRegistry, ElementaryAxis, MIN_DIVISION};
pub use relation::{RepeatRelation, RepeatRelationIndex};
pub use table::RepeatTransformTable;
pub use transform::{RigidTransform, ScrewAxis};
