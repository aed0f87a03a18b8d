//! Error types for the resize and crop pipelines.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Failures of the pre-crop downsampling step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResizeError {
    /// The uploaded bytes could not be decoded.
    #[error("Failed to load image: {0}")]
    Decode(#[from] DecodeError),

    /// The downsampled raster could not be serialized.
    #[error("Failed to create resized image: {0}")]
    BlobEncoding(#[from] EncodeError),
}

/// Failures of the crop/rotate transform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    /// The source image could not be decoded.
    #[error("Failed to load image: {0}")]
    Decode(#[from] DecodeError),

    /// A drawing surface of the requested size cannot be created.
    #[error("Drawing surface of {width}x{height} pixels is unavailable")]
    RenderSurfaceUnavailable { width: u64, height: u64 },

    /// The cropped raster could not be serialized.
    #[error("Failed to create cropped image: {0}")]
    Encoding(#[from] EncodeError),

    /// The selection is empty or leaves the surface it is cut from.
    #[error(
        "Crop area {width}x{height} at ({x}, {y}) does not fit the {surface_width}x{surface_height} image"
    )]
    InvalidSelection {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        surface_width: u32,
        surface_height: u32,
    },

    /// The rotation angle is NaN or infinite.
    #[error("Rotation angle must be finite (got {0})")]
    InvalidRotation(f64),
}
