//! Geometry helpers for the crop UI.
//!
//! The cropper shows the rotated image on its expanded bounding surface, and
//! selections are reported in that surface's pixels. These functions give the
//! UI the same surface size the crop will use.

use aspectcrop_core::transform::{rotated_bounds, surface_dimensions};
use wasm_bindgen::prelude::*;

/// Surface size `[width, height]` for an image rotated by `degrees`.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const [w, h] = rotated_surface_size(info.width, info.height, rotation);
/// ```
#[wasm_bindgen]
pub fn rotated_surface_size(width: u32, height: u32, degrees: f64) -> Vec<u32> {
    let (w, h) = surface_dimensions(rotated_bounds(width, height, degrees));
    vec![clamp_u32(w), clamp_u32(h)]
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
