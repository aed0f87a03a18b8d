//! Pre-crop downsampling of oversized sources.
//!
//! Large photos are scaled down before the user starts selecting, so the
//! selection rectangle, the rotation surface and the exported crop all work
//! against a manageable raster. Images within the ceiling pass through
//! untouched, bytes included.

use super::{decode_image, DecodedImage, EncodedImage, FilterType};
use crate::config::ResizeConfig;
use crate::encode::encode_image;
use crate::error::ResizeError;
use crate::transform::surface_length;

/// A source image ready for cropping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSource {
    /// The bytes to crop from: the upload itself, or a downsampled JPEG.
    pub source: EncodedImage,
    /// Dimensions of the upload before any downsampling.
    pub original_width: u32,
    pub original_height: u32,
    /// Whether `source` was re-encoded at a smaller size.
    pub resized: bool,
}

/// Compute the downsampled size for a `width x height` image.
///
/// Clamps the width first, then the height, each pass scaling the other side
/// proportionally from the original dimensions. Results are truncated to
/// whole pixels, minimum 1.
///
/// # Example
///
/// ```ignore
/// assert_eq!(fit_dimensions(4000, 2000, 3000), (3000, 1500));
/// assert_eq!(fit_dimensions(2000, 6000, 3000), (1000, 3000));
/// ```
pub fn fit_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let (w, h) = (f64::from(width), f64::from(height));
    let max = f64::from(max_dimension);

    let (mut new_w, mut new_h) = (w, h);
    if new_w > max {
        new_w = max;
        new_h = h * max / w;
    }
    if new_h > max {
        new_h = max;
        new_w = w * max / h;
    }

    (to_pixels(new_w), to_pixels(new_h))
}

fn to_pixels(length: f64) -> u32 {
    u32::try_from(surface_length(length)).unwrap_or(u32::MAX).max(1)
}

/// Whether an image exceeds the resize ceiling on either side.
pub fn needs_resize(width: u32, height: u32, config: &ResizeConfig) -> bool {
    width > config.ceiling || height > config.ceiling
}

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `ResizeError::Decode` if the pixel buffer does not match the
/// image dimensions.
pub fn resize_exact(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, ResizeError> {
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image.to_rgb_image().ok_or_else(|| {
        super::DecodeError::CorruptedFile("Pixel buffer does not match dimensions".to_string())
    })?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Downsample `image` if it exceeds the configured ceiling.
///
/// Returns `None` when the image is already within bounds, or when the fitted
/// size equals the current size.
pub fn resize(
    image: &DecodedImage,
    config: &ResizeConfig,
) -> Result<Option<DecodedImage>, ResizeError> {
    if !needs_resize(image.width, image.height, config) {
        return Ok(None);
    }

    let (width, height) = fit_dimensions(image.width, image.height, config.max_dimension);
    if (width, height) == (image.width, image.height) {
        return Ok(None);
    }
    resize_exact(image, width, height, config.filter).map(Some)
}

/// Decode uploaded bytes and downsample them if needed.
///
/// In-bounds images keep their original bytes and format. Oversized images
/// are re-encoded as JPEG at `config.quality`.
///
/// # Errors
///
/// - `ResizeError::Decode` if the bytes are not a readable image
/// - `ResizeError::BlobEncoding` if the downsampled raster cannot be encoded
pub fn prepare_source(bytes: Vec<u8>, config: &ResizeConfig) -> Result<PreparedSource, ResizeError> {
    let (decoded, format) = decode_image(&bytes)?;
    let (original_width, original_height) = (decoded.width, decoded.height);

    match resize(&decoded, config)? {
        None => Ok(PreparedSource {
            source: EncodedImage {
                bytes,
                format,
                width: original_width,
                height: original_height,
            },
            original_width,
            original_height,
            resized: false,
        }),
        Some(smaller) => {
            let source = encode_image(&smaller, config.quality)?;
            log::info!(
                "Image resized: {}x{} → {}x{}",
                original_width,
                original_height,
                source.width,
                source.height
            );
            Ok(PreparedSource {
                source,
                original_width,
                original_height,
                resized: true,
            })
        }
    }
}
