//! Data node implementations for scenekit-rs.
//!
//! This crate provides the concrete node types stored in a scene:
//! - [`MarkupsFiducial`] - An ordered list of control points
//! - [`ScalarVolume`] - A scalar image on a regular grid
//! - [`SurfaceModel`] - A triangulated surface

// Documentation lints
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod markups;
pub mod model;
pub mod volume;

pub use markups::MarkupsFiducial;
pub use model::SurfaceModel;
pub use volume::{ImageData, ScalarVolume};

use glam::DVec3;

/// Axis-aligned bounds of a point set, or `None` when it is empty.
pub(crate) fn bounds_of(points: &[DVec3]) -> Option<(DVec3, DVec3)> {
    let (first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p))),
    )
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_bounds_of_empty() {
        assert_eq!(bounds_of(&[]), None);
    }

    fn point() -> impl Strategy<Value = DVec3> {
        (-1e6f64..1e6, -1e6f64..1e6, -1e6f64..1e6).prop_map(|(x, y, z)| DVec3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn bounds_contain_every_point(points in proptest::collection::vec(point(), 1..64)) {
            let (min, max) = bounds_of(&points).unwrap();
            for p in &points {
                prop_assert!(min.cmple(*p).all());
                prop_assert!(max.cmpge(*p).all());
            }
            // Each bound is attained by some point on every axis.
            for axis in 0..3 {
                prop_assert!(points.iter().any(|p| p[axis] == min[axis]));
                prop_assert!(points.iter().any(|p| p[axis] == max[axis]));
            }
        }
    }
}
