use crate::{DVec3, EventKind, NodeHandle, NodeId, NodeKind, Result, Scene, SceneError, SurfaceModel};

/// Adds a surface model to the scene.
pub fn add_surface_model(scene: &Scene, model: SurfaceModel) -> ModelHandle {
    ModelHandle {
        node: scene.add_node(Box::new(model)),
    }
}

/// Handle for a surface model in the scene.
#[derive(Clone, Debug)]
pub struct ModelHandle {
    node: NodeHandle,
}

impl ModelHandle {
    /// Wraps a node, failing if it is not a surface model.
    pub fn from_node(node: NodeHandle) -> Result<Self> {
        if node.with::<SurfaceModel, _>(|_| ()).is_none() {
            return Err(SceneError::WrongNodeKind {
                id: node.id(),
                expected: NodeKind::Model,
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

    /// Returns whether the model has any triangles.
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        self.node
            .with(SurfaceModel::has_geometry)
            .unwrap_or(false)
    }

    /// Returns the total surface area.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.node.with(SurfaceModel::surface_area).unwrap_or(0.0)
    }

    /// Returns the bounds as `[xmin, xmax, ymin, ymax, zmin, zmax]`.
    #[must_use]
    pub fn bounds_array(&self) -> [f64; 6] {
        self.node
            .with(SurfaceModel::bounds_array)
            .unwrap_or([0.0; 6])
    }

    /// Returns the unweighted vertex centroid.
    #[must_use]
    pub fn center_of_mass(&self) -> DVec3 {
        self.node
            .with(SurfaceModel::center_of_mass)
            .unwrap_or(DVec3::ZERO)
    }

    /// Replaces the geometry. Emits [`EventKind::Modified`] on success.
    pub fn set_geometry(&self, vertices: Vec<DVec3>, faces: Vec<[u32; 3]>) -> Result<()> {
        self.node
            .with_mut(|m: &mut SurfaceModel| m.set_geometry(vertices, faces))
            .unwrap_or(Err(SceneError::NodeNotFound(self.id())))?;
        self.node.events().emit(EventKind::Modified);
        Ok(())
    }
}
