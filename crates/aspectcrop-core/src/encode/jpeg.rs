//! JPEG encoding for resized sources and cropped output.
//!
//! Quality is given as a factor in `(0, 1]`, the convention of the browser's
//! `canvas.toBlob`, and mapped onto the encoder's 1-100 scale.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

use crate::decode::{DecodedImage, EncodedImage, SourceFormat};

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Map a `(0, 1]` quality factor onto the encoder's 1-100 scale.
///
/// Out-of-range and non-finite values are clamped; NaN maps to 1.
pub fn quality_percent(factor: f32) -> u8 {
    let percent = (factor * 100.0).round();
    if percent.is_nan() {
        return 1;
    }
    percent.clamp(1.0, 100.0) as u8
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality factor in `(0, 1]`
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality_percent(quality));

    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode a decoded raster, keeping its dimensions alongside the bytes.
pub fn encode_image(image: &DecodedImage, quality: f32) -> Result<EncodedImage, EncodeError> {
    let bytes = encode_jpeg(&image.pixels, image.width, image.height, quality)?;
    Ok(EncodedImage {
        bytes,
        format: SourceFormat::Jpeg,
        width: image.width,
        height: image.height,
    })
}
