use rand::Rng;

use crate::{DVec3, EventKind, MarkupsFiducial, NodeHandle, NodeId, NodeKind, Result, Scene, SceneError};

/// Adds an empty fiducial list to the scene.
pub fn add_markups_fiducial(scene: &Scene, name: impl Into<String>) -> MarkupsHandle {
    let node = scene.add_node(Box::new(MarkupsFiducial::new(name)));
    MarkupsHandle { node }
}

/// Gets a fiducial list by id.
///
/// Returns `None` if the node is missing or is not a fiducial list.
#[must_use]
pub fn get_markups_fiducial(scene: &Scene, id: NodeId) -> Option<MarkupsHandle> {
    scene
        .node(id)
        .and_then(|node| MarkupsHandle::from_node(node).ok())
}

/// Returns `count` points drawn uniformly from `[-half_range, half_range]`
/// on each axis.
///
/// Fails with [`SceneError::InvalidParameter`] if `half_range` is not finite
/// or larger than [`scenekit_core::MAX_HALF_RANGE`].
pub fn random_points<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    half_range: f64,
) -> Result<Vec<DVec3>> {
    let half_range = scenekit_core::check_half_range(half_range)?;
    if half_range == 0.0 {
        return Ok(vec![DVec3::ZERO; count]);
    }
    Ok((0..count)
        .map(|_| {
            DVec3::new(
                rng.gen_range(-half_range..=half_range),
                rng.gen_range(-half_range..=half_range),
                rng.gen_range(-half_range..=half_range),
            )
        })
        .collect())
}

/// Handle for a fiducial list in the scene.
///
/// Every mutation emits the matching node event once the node borrow is
/// released, so observers can read the node from their callbacks.
#[derive(Clone, Debug)]
pub struct MarkupsHandle {
    node: NodeHandle,
}

impl MarkupsHandle {
    /// Wraps a node, failing if it is not a fiducial list.
    pub fn from_node(node: NodeHandle) -> Result<Self> {
        if node.with::<MarkupsFiducial, _>(|_| ()).is_none() {
            return Err(SceneError::WrongNodeKind {
                id: node.id(),
                expected: NodeKind::Markups,
                actual: node.kind(),
            });
        }
        Ok(Self { node })
    }

    /// Returns the underlying node handle.
    #[must_use]
    pub fn node(&self) -> &NodeHandle {
        &self.node
    }

    /// Returns the node id.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.node.id()
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> String {
        self.node.name()
    }

    fn read<R: Default>(&self, f: impl FnOnce(&MarkupsFiducial) -> R) -> R {
        self.node.with(f).unwrap_or_default()
    }

    /// Returns the number of control points.
    #[must_use]
    pub fn num_control_points(&self) -> usize {
        self.read(MarkupsFiducial::num_control_points)
    }

    /// Returns a copy of all control point positions.
    #[must_use]
    pub fn control_points(&self) -> Vec<DVec3> {
        self.read(|m| m.control_points().to_vec())
    }

    /// Returns the position of one control point.
    pub fn control_point(&self, index: usize) -> Result<DVec3> {
        self.node
            .with(|m: &MarkupsFiducial| {
                m.control_point(index)
                    .ok_or(SceneError::PointIndexOutOfRange {
                        index,
                        len: m.num_control_points(),
                    })
            })
            .unwrap_or(Err(SceneError::NodeNotFound(self.id())))
    }

    /// Moves one control point and emits [`EventKind::PointModified`].
    pub fn set_control_point(&self, index: usize, position: DVec3) -> Result<()> {
        let len = self.num_control_points();
        let moved = self
            .node
            .with_mut(|m: &mut MarkupsFiducial| m.set_control_point(index, position))
            .unwrap_or(false);
        if !moved {
            return Err(SceneError::PointIndexOutOfRange { index, len });
        }
        self.node.events().emit(EventKind::PointModified);
        Ok(())
    }

    /// Appends a control point and emits [`EventKind::PointAdded`].
    ///
    /// Returns the index of the new point.
    pub fn add_control_point(&self, position: DVec3) -> usize {
        let index = self
            .node
            .with_mut(|m: &mut MarkupsFiducial| m.add_control_point(position))
            .unwrap_or_default();
        self.node.events().emit(EventKind::PointAdded);
        index
    }

    /// Removes every control point.
    ///
    /// Emits [`EventKind::PointRemoved`] when there was anything to remove.
    pub fn remove_all_control_points(&self) {
        let removed = self
            .node
            .with_mut(MarkupsFiducial::remove_all_control_points)
            .unwrap_or_default();
        if removed > 0 {
            self.node.events().emit(EventKind::PointRemoved);
        }
    }

    /// Replaces all control points in one batch.
    ///
    /// Observers see a single [`EventKind::Modified`] notification.
    pub fn replace_control_points(&self, positions: &[DVec3]) {
        let was = self.node.start_modify();
        self.remove_all_control_points();
        for &position in positions {
            self.add_control_point(position);
        }
        self.node.end_modify(was);
    }

    /// Returns whether the points are locked against interactive editing.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.read(MarkupsFiducial::is_locked)
    }

    /// Locks or unlocks the points. Emits [`EventKind::Modified`] on change.
    pub fn set_locked(&self, locked: bool) {
        let changed = self
            .node
            .with_mut(|m: &mut MarkupsFiducial| {
                let changed = m.is_locked() != locked;
                m.set_locked(locked);
                changed
            })
            .unwrap_or(false);
        if changed {
            self.node.events().emit(EventKind::Modified);
        }
    }

    /// Returns the display color of selected points.
    #[must_use]
    pub fn selected_color(&self) -> DVec3 {
        self.read(MarkupsFiducial::selected_color)
    }

    /// Sets the display color of selected points. Emits [`EventKind::Modified`].
    pub fn set_selected_color(&self, color: DVec3) {
        self.node
            .with_mut(|m: &mut MarkupsFiducial| m.set_selected_color(color));
        self.node.events().emit(EventKind::Modified);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::{ScalarVolume, UVec3};

    fn recorder(handle: &MarkupsHandle) -> Rc<RefCell<Vec<EventKind>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        for kind in EventKind::MARKUPS {
            let seen = Rc::clone(&seen);
            handle
                .node()
                .events()
                .subscribe(kind, move |k| seen.borrow_mut().push(k));
        }
        seen
    }

    #[test]
    fn test_add_and_move_points() {
        let scene = Scene::new();
        let handle = add_markups_fiducial(&scene, "F");
        let seen = recorder(&handle);

        assert_eq!(handle.add_control_point(DVec3::X), 0);
        assert_eq!(handle.add_control_point(DVec3::Y), 1);
        handle.set_control_point(1, DVec3::Z).unwrap();

        assert_eq!(handle.control_points(), vec![DVec3::X, DVec3::Z]);
        assert_eq!(
            *seen.borrow(),
            vec![EventKind::PointAdded, EventKind::PointAdded, EventKind::PointModified]
        );
    }

    #[test]
    fn test_set_control_point_out_of_range() {
        let scene = Scene::new();
        let handle = add_markups_fiducial(&scene, "F");
        let err = handle.set_control_point(3, DVec3::ONE).unwrap_err();
        assert!(matches!(
            err,
            SceneError::PointIndexOutOfRange { index: 3, len: 0 }
        ));
        assert!(handle.control_point(0).is_err());
    }

    #[test]
    fn test_replace_emits_single_modified() {
        let scene = Scene::new();
        let handle = add_markups_fiducial(&scene, "F");
        handle.add_control_point(DVec3::ONE);
        let seen = recorder(&handle);

        handle.replace_control_points(&[DVec3::X, DVec3::Y, DVec3::Z]);

        assert_eq!(handle.num_control_points(), 3);
        assert_eq!(*seen.borrow(), vec![EventKind::Modified]);
    }

    #[test]
    fn test_set_locked_only_emits_on_change() {
        let scene = Scene::new();
        let handle = add_markups_fiducial(&scene, "F");
        let seen = recorder(&handle);

        handle.set_locked(false);
        assert!(seen.borrow().is_empty());
        handle.set_locked(true);
        assert!(handle.is_locked());
        assert_eq!(*seen.borrow(), vec![EventKind::Modified]);
    }

    #[test]
    fn test_from_node_rejects_other_kinds() {
        let scene = Scene::new();
        let volume = scene.add_node(Box::new(ScalarVolume::gradient(
            "V",
            UVec3::splat(2),
            DVec3::ONE,
        )));
        let err = MarkupsHandle::from_node(volume.clone()).unwrap_err();
        assert!(matches!(
            err,
            SceneError::WrongNodeKind {
                expected: NodeKind::Markups,
                actual: NodeKind::Volume,
                ..
            }
        ));
        assert!(get_markups_fiducial(&scene, volume.id()).is_none());
    }

    #[test]
    fn test_random_points_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = random_points(&mut rng, 100, 30.0).unwrap();
        assert_eq!(points.len(), 100);
        for p in points {
            assert!(p.abs().max_element() <= 30.0);
        }
    }

    #[test]
    fn test_random_points_zero_range() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(random_points(&mut rng, 2, 0.0).unwrap(), vec![DVec3::ZERO; 2]);
        assert!(random_points(&mut rng, 0, 10.0).unwrap().is_empty());
    }
}
