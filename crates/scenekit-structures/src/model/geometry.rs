//! Geometry computation methods for surface models.
//!
//! - Surface area as the sum of triangle areas
//! - Axis-aligned bounds as six scalars
//! - Unweighted center of mass over the vertices
//! - UV sphere construction for fixtures

use std::f64::consts::PI;

use glam::DVec3;

use super::SurfaceModel;

impl SurfaceModel {
    // === Measurement ===

    /// Returns the area of one triangle.
    fn triangle_area(&self, face: [u32; 3]) -> f64 {
        let v0 = self.vertices[face[0] as usize];
        let v1 = self.vertices[face[1] as usize];
        let v2 = self.vertices[face[2] as usize];
        (v1 - v0).cross(v2 - v0).length() * 0.5
    }

    /// Computes the total surface area. Zero when there is no geometry.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.faces.iter().map(|&f| self.triangle_area(f)).sum()
    }

    /// Returns the bounds as `[xmin, xmax, ymin, ymax, zmin, zmax]`.
    ///
    /// All zeros when there is no geometry.
    #[must_use]
    pub fn bounds_array(&self) -> [f64; 6] {
        match crate::bounds_of(&self.vertices) {
            Some((min, max)) => [min.x, max.x, min.y, max.y, min.z, max.z],
            None => [0.0; 6],
        }
    }

    /// Computes the center of mass with every vertex weighted equally.
    ///
    /// The origin when there is no geometry.
    #[must_use]
    pub fn center_of_mass(&self) -> DVec3 {
        if self.vertices.is_empty() {
            return DVec3::ZERO;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.vertices.len() as f64;
        self.vertices.iter().copied().sum::<DVec3>() / count
    }

    // === Construction ===

    /// Builds a UV sphere centered at the origin.
    ///
    /// `theta_resolution` is the number of longitude segments and
    /// `phi_resolution` the number of latitude segments; both are raised to
    /// at least 3. Vertex 0 is the north pole, vertex 1 the south pole, the
    /// rings follow.
    pub fn sphere(
        name: impl Into<String>,
        radius: f64,
        theta_resolution: u32,
        phi_resolution: u32,
    ) -> Self {
        let theta_res = theta_resolution.max(3);
        let phi_res = phi_resolution.max(3);
        let rings = phi_res - 1;

        let mut vertices = Vec::with_capacity(2 + (theta_res * rings) as usize);
        vertices.push(DVec3::new(0.0, 0.0, radius));
        vertices.push(DVec3::new(0.0, 0.0, -radius));
        for j in 0..theta_res {
            let theta = 2.0 * PI * f64::from(j) / f64::from(theta_res);
            for i in 1..phi_res {
                let phi = PI * f64::from(i) / f64::from(phi_res);
                vertices.push(DVec3::new(
                    radius * phi.sin() * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                    radius * phi.cos(),
                ));
            }
        }

        // Ring vertex `i` (1-based latitude) on longitude `j`.
        let index = |j: u32, i: u32| 2 + (j % theta_res) * rings + (i - 1);

        let mut faces = Vec::with_capacity((2 * theta_res * rings) as usize);
        for j in 0..theta_res {
            faces.push([0, index(j, 1), index(j + 1, 1)]);
            for i in 1..rings {
                let a = index(j, i);
                let b = index(j + 1, i);
                let c = index(j + 1, i + 1);
                let d = index(j, i + 1);
                faces.push([a, d, c]);
                faces.push([a, c, b]);
            }
            faces.push([1, index(j + 1, rings), index(j, rings)]);
        }

        Self {
            name: name.into(),
            vertices,
            faces,
        }
    }
}
