//! Configuration options for the modules.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, SceneError};

/// Largest accepted `half_range`. Twice this value, scaled by the uniform
/// sampler, must stay finite.
pub const MAX_HALF_RANGE: f64 = f64::MAX / 4.0;

/// Settings for generating random control points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointGeneration {
    /// Number of points to generate.
    pub count: usize,

    /// Every coordinate is drawn uniformly from `[-half_range, half_range]`.
    pub half_range: f64,
}

impl PointGeneration {
    /// Fiducial generator defaults.
    pub const FIDUCIAL: Self = Self {
        count: 5,
        half_range: 50.0,
    };

    /// Landmark monitor defaults.
    pub const LANDMARK: Self = Self {
        count: 5,
        half_range: 30.0,
    };

    /// Checks that `half_range` can be sampled.
    pub fn validate(&self, key: &str) -> Result<()> {
        match check_half_range(self.half_range) {
            Ok(_) => Ok(()),
            Err(_) => Err(SceneError::InvalidParameter {
                key: format!("{key}.half_range"),
                value: self.half_range.to_string(),
            }),
        }
    }
}

/// Fails unless `half_range` is finite and at most [`MAX_HALF_RANGE`] in
/// magnitude.
pub fn check_half_range(half_range: f64) -> Result<f64> {
    if half_range.is_finite() && half_range.abs() <= MAX_HALF_RANGE {
        Ok(half_range.abs())
    } else {
        Err(SceneError::InvalidParameter {
            key: "half_range".to_string(),
            value: half_range.to_string(),
        })
    }
}

/// A `PointGeneration` as it appears in JSON, with every field optional.
#[derive(Deserialize)]
struct PointGenerationFields {
    count: Option<usize>,
    half_range: Option<f64>,
}

impl PointGenerationFields {
    fn or(self, fallback: PointGeneration) -> PointGeneration {
        PointGeneration {
            count: self.count.unwrap_or(fallback.count),
            half_range: self.half_range.unwrap_or(fallback.half_range),
        }
    }
}

fn fiducial_points<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<PointGeneration, D::Error> {
    PointGenerationFields::deserialize(deserializer).map(|f| f.or(PointGeneration::FIDUCIAL))
}

fn landmark_points<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<PointGeneration, D::Error> {
    PointGenerationFields::deserialize(deserializer).map(|f| f.or(PointGeneration::LANDMARK))
}

/// Global configuration options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Points created by the fiducial generator.
    #[serde(deserialize_with = "fiducial_points")]
    pub fiducial_generation: PointGeneration,

    /// Base name for generated fiducial nodes.
    pub fiducial_base_name: String,

    /// Points created by the landmark monitor's auto-generate action.
    #[serde(deserialize_with = "landmark_points")]
    pub landmark_generation: PointGeneration,

    /// Lower end of the threshold slider.
    pub threshold_min: f64,

    /// Upper end of the threshold slider.
    pub threshold_max: f64,

    /// Threshold written into a fresh store.
    pub default_threshold: f64,

    /// Invert flag written into a fresh store.
    pub default_invert: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fiducial_generation: PointGeneration::FIDUCIAL,
            fiducial_base_name: "RandomFiducial".to_string(),
            landmark_generation: PointGeneration::LANDMARK,
            threshold_min: 0.0,
            threshold_max: 100.0,
            default_threshold: 50.0,
            default_invert: false,
        }
    }
}

impl Options {
    /// Parses options from JSON. Missing fields take their default values.
    ///
    /// Fails if a point range cannot be sampled.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Checks the values serde cannot.
    pub fn validate(&self) -> Result<()> {
        self.fiducial_generation.validate("fiducial_generation")?;
        self.landmark_generation.validate("landmark_generation")
    }

    /// Serializes options to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Clamps a threshold into the slider range.
    ///
    /// A misconfigured range with `threshold_min > threshold_max` yields
    /// `threshold_max`.
    pub fn clamp_threshold(&self, value: f64) -> f64 {
        value.max(self.threshold_min).min(self.threshold_max)
    }
}
