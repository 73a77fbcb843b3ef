//! Surface model node: a triangulated surface.

mod geometry;
mod io;

use std::any::Any;

use glam::DVec3;
use scenekit_core::{Node, NodeKind, Result, SceneError};

/// A triangle mesh.
///
/// A model may have no geometry at all (an empty vertex list), which is how
/// a freshly created model node looks before a surface is assigned to it.
#[derive(Debug, Clone)]
pub struct SurfaceModel {
    name: String,
    vertices: Vec<DVec3>,
    faces: Vec<[u32; 3]>,
}

impl SurfaceModel {
    /// Creates a model with no geometry.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Creates a model from vertices and triangles.
    ///
    /// Fails if a face refers to a vertex that does not exist.
    pub fn with_geometry(
        name: impl Into<String>,
        vertices: Vec<DVec3>,
        faces: Vec<[u32; 3]>,
    ) -> Result<Self> {
        let mut model = Self::new(name);
        model.set_geometry(vertices, faces)?;
        Ok(model)
    }

    /// Replaces the geometry, validating face indices.
    pub fn set_geometry(&mut self, vertices: Vec<DVec3>, faces: Vec<[u32; 3]>) -> Result<()> {
        if let Some(&bad) = faces
            .iter()
            .flatten()
            .find(|&&index| index as usize >= vertices.len())
        {
            return Err(SceneError::PointIndexOutOfRange {
                index: bad as usize,
                len: vertices.len(),
            });
        }
        self.vertices = vertices;
        self.faces = faces;
        Ok(())
    }

    /// Removes all geometry.
    pub fn clear_geometry(&mut self) {
        self.vertices.clear();
        self.faces.clear();
    }

    /// Returns whether the model has any vertices.
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        !self.vertices.is_empty()
    }

    /// Returns the vertex positions.
    #[must_use]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns the triangles.
    #[must_use]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[must_use]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }
}

impl Node for SurfaceModel {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Model
    }

    fn bounds(&self) -> Option<(DVec3, DVec3)> {
        crate::bounds_of(&self.vertices)
    }
}
