use crate::{
    DVec3, EventKind, ImageData, NodeHandle, NodeId, NodeKind, Result, ScalarVolume, Scene,
    SceneError, UVec3,
};

/// Adds a scalar volume to the scene.
pub fn add_scalar_volume(scene: &Scene, volume: ScalarVolume) -> VolumeHandle {
    VolumeHandle {
        node: scene.add_node(Box::new(volume)),
    }
}

/// Handle for a scalar volume in the scene.
#[derive(Clone, Debug)]
pub struct VolumeHandle {
    node: NodeHandle,
}

impl VolumeHandle {
    /// Wraps a node, failing if it is not a scalar volume.
    pub fn from_node(node: NodeHandle) -> Result<Self> {
        if node.with::<ScalarVolume, _>(|_| ()).is_none() {
            return Err(SceneError::WrongNodeKind {
                id: node.id(),
                expected: NodeKind::Volume,
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

    /// Returns the voxel counts, or `None` without image data.
    #[must_use]
    pub fn image_dimensions(&self) -> Option<UVec3> {
        self.node
            .with(|v: &ScalarVolume| v.image().map(ImageData::dimensions))
            .flatten()
    }

    /// Returns the voxel spacing in millimetres.
    #[must_use]
    pub fn spacing(&self) -> DVec3 {
        self.node
            .with(ScalarVolume::spacing)
            .unwrap_or(DVec3::ONE)
    }

    /// Returns the minimum and maximum voxel value, or `None` without
    /// image data.
    #[must_use]
    pub fn scalar_range(&self) -> Option<(f64, f64)> {
        self.node
            .with(|v: &ScalarVolume| v.image().and_then(ImageData::scalar_range))
            .flatten()
    }

    /// Replaces the image data. Emits [`EventKind::Modified`].
    pub fn set_image(&self, image: Option<ImageData>) {
        self.node
            .with_mut(|v: &mut ScalarVolume| v.set_image(image));
        self.node.events().emit(EventKind::Modified);
    }

    /// Sets the voxel spacing. Emits [`EventKind::Modified`].
    pub fn set_spacing(&self, spacing: DVec3) {
        self.node
            .with_mut(|v: &mut ScalarVolume| v.set_spacing(spacing));
        self.node.events().emit(EventKind::Modified);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_reads_image_properties() {
        let scene = Scene::new();
        let handle = add_scalar_volume(
            &scene,
            ScalarVolume::gradient("V", UVec3::new(4, 3, 2), DVec3::new(0.5, 0.5, 2.0)),
        );

        assert_eq!(handle.image_dimensions(), Some(UVec3::new(4, 3, 2)));
        assert_eq!(handle.spacing(), DVec3::new(0.5, 0.5, 2.0));
        assert_eq!(handle.scalar_range(), Some((0.0, 6.0)));
    }

    #[test]
    fn test_set_image_notifies() {
        let scene = Scene::new();
        let handle = add_scalar_volume(&scene, ScalarVolume::new("V"));
        assert_eq!(handle.image_dimensions(), None);
        assert_eq!(handle.scalar_range(), None);

        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        handle
            .node()
            .events()
            .subscribe(EventKind::Modified, move |_| c.set(c.get() + 1));

        let image = ImageData::new(UVec3::new(2, 1, 1), vec![-1.0, 3.0]).unwrap();
        handle.set_image(Some(image));
        handle.set_spacing(DVec3::splat(2.0));

        assert_eq!(count.get(), 2);
        assert_eq!(handle.scalar_range(), Some((-1.0, 3.0)));
    }
}
