//! Crop and rotate raster kernel.
//!
//! # Two paths
//!
//! - **Unrotated** (0° modulo 360, within 0.001°): the selection is copied
//!   1:1 out of the source.
//! - **Rotated**: the source is first rotated onto its expanded bounding
//!   surface, then the selection is copied out of that surface.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise
//! - Selections are whole pixels in the space of the surface being cut
//! - Origin is top-left corner

mod crop;
mod rotation;
mod surface;

pub use crop::{crop_region, Selection};
pub use rotation::{
    is_unrotated, normalize_angle, rotate_expand, rotated_bounds, surface_dimensions,
};
pub use surface::{allocate_surface, surface_length};

use crate::decode::DecodedImage;
use crate::error::CropError;

/// Cut `selection` out of `image` rotated by `degrees`.
///
/// The selection is not clipped: callers clamp it to the surface size from
/// [`surface_dimensions`], which truncates the fractional bounding box.
///
/// # Errors
///
/// - `CropError::InvalidRotation` for non-finite angles
/// - `CropError::InvalidSelection` if the selection leaves the surface
/// - `CropError::RenderSurfaceUnavailable` if a surface cannot be allocated
pub fn render(
    image: &DecodedImage,
    selection: Selection,
    degrees: f64,
    max_surface_pixels: u64,
) -> Result<DecodedImage, CropError> {
    if is_unrotated(degrees)? {
        return crop_region(image, selection, max_surface_pixels);
    }

    let rotated = rotate_expand(image, degrees, max_surface_pixels)?;
    crop_region(&rotated, selection, max_surface_pixels)
}
