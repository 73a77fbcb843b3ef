//! Scalar volume node: an image on a regular axis-aligned grid.

use std::any::Any;

use glam::{DVec3, UVec3};
use scenekit_core::{Node, NodeKind, Result, SceneError};

/// Voxel data of a scalar volume.
///
/// Scalars are stored x-fastest: index `i + j * nx + k * nx * ny`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    dimensions: UVec3,
    scalars: Vec<f32>,
}

impl ImageData {
    /// Creates image data, checking that the buffer matches the dimensions.
    pub fn new(dimensions: UVec3, scalars: Vec<f32>) -> Result<Self> {
        let expected = Self::voxel_count(dimensions);
        if scalars.len() != expected {
            return Err(SceneError::SizeMismatch {
                expected,
                actual: scalars.len(),
            });
        }
        Ok(Self {
            dimensions,
            scalars,
        })
    }

    fn voxel_count(dimensions: UVec3) -> usize {
        dimensions.x as usize * dimensions.y as usize * dimensions.z as usize
    }

    /// Returns the number of voxels along each axis.
    #[must_use]
    pub fn dimensions(&self) -> UVec3 {
        self.dimensions
    }

    /// Returns the scalar buffer.
    #[must_use]
    pub fn scalars(&self) -> &[f32] {
        &self.scalars
    }

    /// Flattens a 3D voxel index to a linear index.
    #[must_use]
    pub fn flatten_index(&self, i: u32, j: u32, k: u32) -> usize {
        let (nx, ny) = (self.dimensions.x as usize, self.dimensions.y as usize);
        i as usize + j as usize * nx + k as usize * nx * ny
    }

    /// Returns the scalar at a voxel, or `None` outside the grid.
    #[must_use]
    pub fn value(&self, i: u32, j: u32, k: u32) -> Option<f32> {
        if i >= self.dimensions.x || j >= self.dimensions.y || k >= self.dimensions.z {
            return None;
        }
        self.scalars.get(self.flatten_index(i, j, k)).copied()
    }

    /// Returns the smallest and largest scalar, or `None` for an empty image.
    #[must_use]
    pub fn scalar_range(&self) -> Option<(f64, f64)> {
        let mut values = self.scalars.iter().map(|&v| f64::from(v));
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// A scalar volume.
///
/// A volume may exist without voxel data (for instance before an image is
/// loaded into it); spacing and origin are properties of the node itself.
#[derive(Debug, Clone)]
pub struct ScalarVolume {
    name: String,
    spacing: DVec3,
    origin: DVec3,
    image: Option<ImageData>,
}

impl ScalarVolume {
    /// Creates a volume with unit spacing and no image.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spacing: DVec3::ONE,
            origin: DVec3::ZERO,
            image: None,
        }
    }

    /// Creates a volume holding `image`.
    pub fn with_image(name: impl Into<String>, image: ImageData, spacing: DVec3) -> Self {
        Self {
            spacing,
            image: Some(image),
            ..Self::new(name)
        }
    }

    /// Creates a synthetic volume whose voxel `(i, j, k)` holds `i + j + k`.
    ///
    /// Stands in for downloaded sample data in tests and demos.
    pub fn gradient(name: impl Into<String>, dimensions: UVec3, spacing: DVec3) -> Self {
        let mut scalars = Vec::with_capacity(ImageData::voxel_count(dimensions));
        for k in 0..dimensions.z {
            for j in 0..dimensions.y {
                for i in 0..dimensions.x {
                    #[allow(clippy::cast_precision_loss)]
                    scalars.push((i + j + k) as f32);
                }
            }
        }
        let image = ImageData {
            dimensions,
            scalars,
        };
        Self::with_image(name, image, spacing)
    }

    /// Returns the voxel data, if any.
    #[must_use]
    pub fn image(&self) -> Option<&ImageData> {
        self.image.as_ref()
    }

    /// Replaces the voxel data.
    pub fn set_image(&mut self, image: Option<ImageData>) {
        self.image = image;
    }

    /// Returns the voxel spacing.
    #[must_use]
    pub fn spacing(&self) -> DVec3 {
        self.spacing
    }

    /// Sets the voxel spacing.
    pub fn set_spacing(&mut self, spacing: DVec3) {
        self.spacing = spacing;
    }

    /// Returns the world position of voxel `(0, 0, 0)`.
    #[must_use]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Sets the world position of voxel `(0, 0, 0)`.
    pub fn set_origin(&mut self, origin: DVec3) {
        self.origin = origin;
    }
}

impl Node for ScalarVolume {
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
        NodeKind::Volume
    }

    fn bounds(&self) -> Option<(DVec3, DVec3)> {
        let image = self.image.as_ref()?;
        if image.dimensions.cmpeq(UVec3::ZERO).any() {
            return None;
        }
        let extent = (image.dimensions - UVec3::ONE).as_dvec3() * self.spacing;
        let a = self.origin;
        let b = self.origin + extent;
        Some((a.min(b), a.max(b)))
    }
}
