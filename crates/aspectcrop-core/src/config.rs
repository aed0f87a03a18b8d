//! Tunable settings for classification, resizing and export.
//!
//! Every struct deserializes with `#[serde(default)]`, so a UI can send a
//! partial object (say, only `{ "aspect": { "tolerance": 0.05 } }`) and get
//! the stock values for everything else.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::FilterType;

/// Largest drawing surface, in pixels, that browsers reliably allocate
/// (16384 x 16384).
pub const DEFAULT_MAX_SURFACE_PIXELS: u64 = 16_384 * 16_384;

/// Errors raised by [`CropConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("At least one aspect target is required")]
    NoTargets,

    #[error("Aspect target {name:?} has invalid ratio {value}")]
    InvalidTarget { name: String, value: f64 },

    #[error("Tolerance must be a finite, non-negative number (got {0})")]
    InvalidTolerance(f64),

    #[error("Resize limits must be non-zero with max dimension at or below the ceiling (ceiling {ceiling}, max dimension {max_dimension})")]
    InvalidResizeLimits { ceiling: u32, max_dimension: u32 },

    #[error("Quality must be within (0, 1] (got {0})")]
    InvalidQuality(f32),

    #[error("Surface limit must be non-zero")]
    InvalidSurfaceLimit,
}

/// One accepted width/height ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectTarget {
    /// Short ratio name, e.g. `"4:5"`.
    pub name: String,
    /// Human description, e.g. `"Portrait"`.
    #[serde(default)]
    pub description: String,
    /// Width divided by height.
    pub value: f64,
}

impl AspectTarget {
    pub fn new(name: impl Into<String>, description: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value,
        }
    }

    /// Label shown in the ratio picker, e.g. `"1:1 (Square)"`.
    pub fn display_label(&self) -> String {
        if self.description.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.description)
        }
    }
}

/// The ordered set of accepted ratios and the match tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AspectConfig {
    /// Accepted ratios. Order matters: it breaks ties in nearest-target search.
    pub targets: Vec<AspectTarget>,
    /// Maximum absolute deviation from a target ratio.
    pub tolerance: f64,
}

impl Default for AspectConfig {
    fn default() -> Self {
        Self {
            targets: vec![
                AspectTarget::new("1:1", "Square", 1.0),
                AspectTarget::new("4:5", "Portrait", 4.0 / 5.0),
                AspectTarget::new("1.91:1", "Landscape", 1.91),
            ],
            tolerance: 0.02,
        }
    }
}

impl AspectConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        if let Some(bad) = self
            .targets
            .iter()
            .find(|t| !t.value.is_finite() || t.value <= 0.0)
        {
            return Err(ConfigError::InvalidTarget {
                name: bad.name.clone(),
                value: bad.value,
            });
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }
}

/// Settings for the pre-crop downsampling step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Images with both sides at or below this are left untouched.
    pub ceiling: u32,
    /// Longest side after downsampling.
    pub max_dimension: u32,
    /// JPEG quality factor for the downsampled source, in (0, 1].
    pub quality: f32,
    pub filter: FilterType,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            ceiling: 4000,
            max_dimension: 3000,
            quality: 0.9,
            filter: FilterType::Lanczos3,
        }
    }
}

impl ResizeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ceiling == 0 || self.max_dimension == 0 || self.max_dimension > self.ceiling {
            return Err(ConfigError::InvalidResizeLimits {
                ceiling: self.ceiling,
                max_dimension: self.max_dimension,
            });
        }
        validate_quality(self.quality)
    }
}

/// Settings for the final cropped output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// JPEG quality factor for cropped output, in (0, 1].
    pub quality: f32,
    /// Largest drawing surface the transform may allocate.
    pub max_surface_pixels: u64,
    /// Prefix prepended to the original file name.
    pub file_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            quality: 0.95,
            max_surface_pixels: DEFAULT_MAX_SURFACE_PIXELS,
            file_prefix: "cropped-".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_surface_pixels == 0 {
            return Err(ConfigError::InvalidSurfaceLimit);
        }
        validate_quality(self.quality)
    }

    /// Download name for a cropped copy of `original_name`.
    pub fn output_name(&self, original_name: &str) -> String {
        format!("{}{}", self.file_prefix, original_name)
    }
}

fn validate_quality(quality: f32) -> Result<(), ConfigError> {
    if quality.is_finite() && quality > 0.0 && quality <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidQuality(quality))
    }
}

/// Complete configuration for a cropping session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    pub aspect: AspectConfig,
    pub resize: ResizeConfig,
    pub export: ExportConfig,
}

impl CropConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.aspect.validate()?;
        self.resize.validate()?;
        self.export.validate()
    }
}
