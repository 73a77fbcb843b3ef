//! Loading surface models from Wavefront OBJ files.

use std::io::BufRead;
use std::path::Path;

use glam::DVec3;
use scenekit_core::{Result, SceneError};

use super::SurfaceModel;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

fn model_error(err: tobj::LoadError) -> SceneError {
    SceneError::ModelLoad(err.to_string())
}

impl SurfaceModel {
    /// Loads every mesh of an OBJ file into one model.
    pub fn load_obj(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(path, &load_options()).map_err(model_error)?;
        log::debug!("loaded {} mesh(es) from {}", models.len(), path.display());
        Self::from_tobj(name, models)
    }

    /// Reads OBJ text from a buffered reader. Material libraries are ignored.
    pub fn from_obj_reader(name: impl Into<String>, reader: &mut impl BufRead) -> Result<Self> {
        let (models, _materials) =
            tobj::load_obj_buf(reader, &load_options(), |_| Err(tobj::LoadError::OpenFileFailed))
                .map_err(model_error)?;
        Self::from_tobj(name, models)
    }

    fn from_tobj(name: impl Into<String>, models: Vec<tobj::Model>) -> Result<Self> {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for model in models {
            let mesh = model.mesh;
            let offset = u32::try_from(vertices.len())
                .map_err(|_| SceneError::ModelLoad("too many vertices".to_string()))?;

            vertices.extend(mesh.positions.chunks_exact(3).map(|p| {
                DVec3::new(f64::from(p[0]), f64::from(p[1]), f64::from(p[2]))
            }));
            faces.extend(
                mesh.indices
                    .chunks_exact(3)
                    .map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]),
            );
        }

        Self::with_geometry(name, vertices, faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRAHEDRON: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
f 1 3 2
f 1 2 4
f 1 4 3
f 2 3 4
";

    #[test]
    fn test_reads_tetrahedron() {
        let model = SurfaceModel::from_obj_reader("tet", &mut TETRAHEDRON.as_bytes()).unwrap();
        assert_eq!(model.num_vertices(), 4);
        assert_eq!(model.num_faces(), 4);

        // Three right triangles of area 0.5 plus an equilateral one with side sqrt(2).
        let expected = 1.5 + 3f64.sqrt() / 2.0;
        assert!((model.surface_area() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file() {
        let result = SurfaceModel::load_obj("x", "/no/such/model.obj");
        assert!(matches!(result, Err(SceneError::ModelLoad(_))));
    }
}
