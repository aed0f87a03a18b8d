//! Drawing-surface allocation.
//!
//! Every transform writes into a freshly allocated black RGB surface. Sizes
//! arrive as floating-point geometry and are truncated the way a canvas
//! truncates its `width`/`height` attributes.

use crate::decode::DecodedImage;
use crate::error::CropError;

/// Absorbs floating-point noise such as `2999.9999999996` before truncation.
const LENGTH_EPSILON: f64 = 1e-6;

/// Truncate a geometric length to a whole number of pixels.
///
/// Negative and NaN lengths become 0.
pub fn surface_length(length: f64) -> u64 {
    let truncated = (length + LENGTH_EPSILON).floor();
    if truncated.is_nan() || truncated <= 0.0 {
        0
    } else if truncated >= u64::MAX as f64 {
        u64::MAX
    } else {
        truncated as u64
    }
}

/// Allocate a black surface of `width x height` pixels.
///
/// # Errors
///
/// `CropError::RenderSurfaceUnavailable` when either side is zero, the area
/// exceeds `max_pixels` or the address space, or the allocation fails.
pub fn allocate_surface(width: u64, height: u64, max_pixels: u64) -> Result<DecodedImage, CropError> {
    let unavailable = || CropError::RenderSurfaceUnavailable { width, height };

    if width == 0 || height == 0 {
        return Err(unavailable());
    }

    let area = width.checked_mul(height).ok_or_else(unavailable)?;
    if area > max_pixels {
        log::debug!("surface {}x{} exceeds limit of {} pixels", width, height, max_pixels);
        return Err(unavailable());
    }

    let w = u32::try_from(width).map_err(|_| unavailable())?;
    let h = u32::try_from(height).map_err(|_| unavailable())?;
    let len = usize::try_from(area)
        .ok()
        .and_then(|a| a.checked_mul(3))
        .ok_or_else(unavailable)?;

    let mut pixels = Vec::new();
    pixels.try_reserve_exact(len).map_err(|_| unavailable())?;
    pixels.resize(len, 0);

    Ok(DecodedImage::new(w, h, pixels))
}
