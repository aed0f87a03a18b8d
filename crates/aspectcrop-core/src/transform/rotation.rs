//! Rotation onto an expanded bounding surface.
//!
//! The source is rotated about its centre and drawn centred on a surface
//! large enough to hold every corner. Area not covered by the source stays
//! black.
//!
//! # Algorithm
//!
//! Inverse mapping: for each destination pixel centre we find the source
//! position it came from and sample it bilinearly. Angles are in degrees,
//! positive = clockwise on screen (y grows downward). For angle θ:
//! ```text
//! src_x =  dx * cos(θ) + dy * sin(θ) + src_cx
//! src_y = -dx * sin(θ) + dy * cos(θ) + src_cy
//! ```
//! where `(dx, dy)` is the destination pixel centre relative to the
//! bounding-box centre.
//!
//! Exact quarter turns skip resampling and remap pixels directly.

use super::surface::{allocate_surface, surface_length};
use crate::decode::DecodedImage;
use crate::error::CropError;

/// Angles closer than this to a multiple of 90° are treated as exact.
const ANGLE_SLACK: f64 = 0.001;

/// Reduce an angle to `[0, 360)`.
///
/// # Errors
///
/// `CropError::InvalidRotation` for NaN or infinite angles.
pub fn normalize_angle(degrees: f64) -> Result<f64, CropError> {
    if !degrees.is_finite() {
        return Err(CropError::InvalidRotation(degrees));
    }
    Ok(degrees.rem_euclid(360.0))
}

/// Number of clockwise quarter turns if `normalized` is within slack of one.
fn quarter_turns(normalized: f64) -> Option<u8> {
    (0u8..=4)
        .find(|&k| (normalized - f64::from(k) * 90.0).abs() < ANGLE_SLACK)
        .map(|k| k % 4)
}

/// Whether an angle leaves the image unrotated (0° modulo 360, with slack).
pub fn is_unrotated(degrees: f64) -> Result<bool, CropError> {
    Ok(quarter_turns(normalize_angle(degrees)?) == Some(0))
}

/// Size of the box that holds a `width x height` rectangle rotated by `degrees`.
///
/// ```text
/// rotated_w = |w * cos θ| + |h * sin θ|
/// rotated_h = |w * sin θ| + |h * cos θ|
/// ```
///
/// # Example
///
/// ```ignore
/// use aspectcrop_core::transform::rotated_bounds;
///
/// let (w, h) = rotated_bounds(100, 100, 45.0);
/// assert!((w - 141.42).abs() < 0.01);
/// ```
pub fn rotated_bounds(width: u32, height: u32, degrees: f64) -> (f64, f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let (w, h) = (f64::from(width), f64::from(height));

    (w * cos + h * sin, w * sin + h * cos)
}

/// Truncate rotated bounds to whole surface pixels.
pub fn surface_dimensions(bounds: (f64, f64)) -> (u64, u64) {
    (surface_length(bounds.0), surface_length(bounds.1))
}

/// Rotate `image` by `degrees` onto its expanded bounding surface.
///
/// Quarter turns (within 0.001°) produce an exact pixel remap with swapped
/// dimensions. Other angles allocate the truncated bounding box and resample.
///
/// # Errors
///
/// - `CropError::InvalidRotation` for non-finite angles
/// - `CropError::RenderSurfaceUnavailable` if the surface cannot be allocated
pub fn rotate_expand(
    image: &DecodedImage,
    degrees: f64,
    max_surface_pixels: u64,
) -> Result<DecodedImage, CropError> {
    let normalized = normalize_angle(degrees)?;

    if let Some(turns) = quarter_turns(normalized) {
        return rotate_quarter_turns(image, turns, max_surface_pixels);
    }

    if image.is_empty() {
        return Err(CropError::RenderSurfaceUnavailable {
            width: u64::from(image.width),
            height: u64::from(image.height),
        });
    }

    let bounds = rotated_bounds(image.width, image.height, normalized);
    let (surface_w, surface_h) = surface_dimensions(bounds);
    let mut output = allocate_surface(surface_w, surface_h, max_surface_pixels)?;

    log::debug!(
        "rotating {}x{} by {:.3} onto {}x{} surface",
        image.width,
        image.height,
        normalized,
        output.width,
        output.height
    );

    let (sin, cos) = normalized.to_radians().sin_cos();
    let dst_cx = bounds.0 / 2.0;
    let dst_cy = bounds.1 / 2.0;
    let src_cx = f64::from(image.width) / 2.0;
    let src_cy = f64::from(image.height) / 2.0;

    let row_len = output.width as usize * 3;
    for (dst_y, row) in output.pixels.chunks_exact_mut(row_len).enumerate() {
        let dy = dst_y as f64 + 0.5 - dst_cy;
        for (dst_x, px) in row.chunks_exact_mut(3).enumerate() {
            let dx = dst_x as f64 + 0.5 - dst_cx;

            let src_x = dx * cos + dy * sin + src_cx;
            let src_y = -dx * sin + dy * cos + src_cy;

            // Continuous coordinates to pixel-index space (centre of pixel i at i).
            if let Some(rgb) = sample_bilinear(image, src_x - 0.5, src_y - 0.5) {
                px.copy_from_slice(&rgb);
            }
        }
    }

    Ok(output)
}

/// Lossless clockwise rotation by `turns` quarter turns.
fn rotate_quarter_turns(
    image: &DecodedImage,
    turns: u8,
    max_surface_pixels: u64,
) -> Result<DecodedImage, CropError> {
    let (w, h) = (image.width, image.height);
    let (out_w, out_h) = if turns % 2 == 1 { (h, w) } else { (w, h) };

    let mut output = allocate_surface(u64::from(out_w), u64::from(out_h), max_surface_pixels)?;

    for y in 0..out_h {
        for x in 0..out_w {
            let (sx, sy) = match turns {
                0 => (x, y),
                1 => (y, h - 1 - x),
                2 => (w - 1 - x, h - 1 - y),
                _ => (w - 1 - y, x),
            };
            let idx = (y as usize * out_w as usize + x as usize) * 3;
            output.pixels[idx..idx + 3].copy_from_slice(&image.pixel(sx, sy));
        }
    }

    Ok(output)
}

/// Sample at pixel-index coordinates, or `None` outside the source footprint.
///
/// The footprint extends half a pixel past the outermost pixel centres; there
/// the nearest edge pixel is used.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> Option<[u8; 3]> {
    const EDGE: f64 = 0.5 + 1e-9;
    let max_x = f64::from(image.width) - 1.0;
    let max_y = f64::from(image.height) - 1.0;

    if x < -EDGE || x > max_x + EDGE || y < -EDGE || y > max_y + EDGE {
        return None;
    }

    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(image.width - 1);
    let y1 = (y0 + 1).min(image.height - 1);

    let fx = x - f64::from(x0);
    let fy = y - f64::from(y0);

    let p00 = image.pixel(x0, y0);
    let p10 = image.pixel(x1, y0);
    let p01 = image.pixel(x0, y1);
    let p11 = image.pixel(x1, y1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = f64::from(p00[i]) * (1.0 - fx) * (1.0 - fy)
            + f64::from(p10[i]) * fx * (1.0 - fy)
            + f64::from(p01[i]) * (1.0 - fx) * fy
            + f64::from(p11[i]) * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    Some(result)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
