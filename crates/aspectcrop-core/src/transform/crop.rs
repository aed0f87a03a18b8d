//! Rectangular region copy.
//!
//! Selections are in pixel coordinates of the surface being cut: the source
//! image when unrotated, the rotated bounding surface otherwise.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left corner
//! - x grows right, y grows down
//! - a selection must lie entirely inside the surface

use serde::{Deserialize, Serialize};

use super::surface::allocate_surface;
use crate::decode::DecodedImage;
use crate::error::CropError;

/// Crop rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Selection {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Selection covering a whole `width x height` surface.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Whether the selection is non-empty and inside a `width x height` surface.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }

    pub(crate) fn check_within(&self, width: u32, height: u32) -> Result<(), CropError> {
        if self.fits_within(width, height) {
            Ok(())
        } else {
            Err(CropError::InvalidSelection {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                surface_width: width,
                surface_height: height,
            })
        }
    }
}

/// Copy the selected block of `image` into a new surface at (0, 0).
///
/// The copy is 1:1; no resampling takes place. The output is exactly
/// `selection.width x selection.height`.
///
/// # Errors
///
/// - `CropError::InvalidSelection` if the selection is empty or out of bounds
/// - `CropError::RenderSurfaceUnavailable` if the output cannot be allocated
pub fn crop_region(
    image: &DecodedImage,
    selection: Selection,
    max_surface_pixels: u64,
) -> Result<DecodedImage, CropError> {
    selection.check_within(image.width, image.height)?;

    let mut output = allocate_surface(
        u64::from(selection.width),
        u64::from(selection.height),
        max_surface_pixels,
    )?;

    let src_stride = image.width as usize * 3;
    let row_len = selection.width as usize * 3;
    let x_offset = selection.x as usize * 3;

    for (row, dst) in output.pixels.chunks_exact_mut(row_len).enumerate() {
        let src_start = (selection.y as usize + row) * src_stride + x_offset;
        dst.copy_from_slice(&image.pixels[src_start..src_start + row_len]);
    }

    Ok(output)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn create_test_image(width: u32, height: u32) -> DecodedImage {
        let pixels = (0..width * height)
            .flat_map(|i| {
                let v = (i % 251) as u8;
                [v, v.wrapping_mul(3), v.wrapping_add(7)]
            })
            .collect();
        DecodedImage::new(width, height, pixels)
    }

    /// Image dimensions plus a selection guaranteed to fit inside them.
    fn image_and_selection() -> impl Strategy<Value = (u32, u32, Selection)> {
        (1u32..=60, 1u32..=60).prop_flat_map(|(w, h)| {
            (0..w, 0..h).prop_flat_map(move |(x, y)| {
                (1..=w - x, 1..=h - y)
                    .prop_map(move |(sw, sh)| (w, h, Selection::new(x, y, sw, sh)))
            })
        })
    }

    proptest! {
        /// Property: output is exactly the selection size.
        #[test]
        fn prop_output_matches_selection((w, h, sel) in image_and_selection()) {
            let img = create_test_image(w, h);
            let result = crop_region(&img, sel, u64::MAX).unwrap();

            prop_assert_eq!(result.width, sel.width);
            prop_assert_eq!(result.height, sel.height);
            prop_assert_eq!(result.pixels.len(), (sel.width * sel.height * 3) as usize);
        }

        /// Property: every output pixel is the source pixel at the offset position.
        #[test]
        fn prop_pixels_copied_verbatim((w, h, sel) in image_and_selection()) {
            let img = create_test_image(w, h);
            let result = crop_region(&img, sel, u64::MAX).unwrap();

            for y in 0..sel.height {
                for x in 0..sel.width {
                    prop_assert_eq!(result.pixel(x, y), img.pixel(sel.x + x, sel.y + y));
                }
            }
        }

        /// Property: full-image selection round-trips.
        #[test]
        fn prop_full_selection_round_trip(w in 1u32..=80, h in 1u32..=80) {
            let img = create_test_image(w, h);
            let result = crop_region(&img, Selection::full(w, h), u64::MAX).unwrap();
            prop_assert_eq!(result, img);
        }

        /// Property: selections reaching past the right edge are rejected.
        #[test]
        fn prop_overhang_rejected(w in 1u32..=40, h in 1u32..=40, extra in 1u32..=10) {
            let img = create_test_image(w, h);
            let sel = Selection::new(0, 0, w + extra, h);
            prop_assert!(crop_region(&img, sel, u64::MAX).is_err());
        }
    }
}
