//! Producing the final cropped JPEG.
//!
//! The rotated path needs a surface as large as the rotated bounding box,
//! which can fail for big images. `crop_with_fallback` retries such failures
//! once with the unrotated path so the user still gets a result.

use crate::config::CropConfig;
use crate::decode::{decode_image, DecodedImage, EncodedImage};
use crate::encode::encode_image;
use crate::error::CropError;
use crate::transform::{is_unrotated, render, Selection};

/// A finished crop ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CroppedRaster {
    /// Download name, `cropped-<original name>` by default.
    pub file_name: String,
    /// JPEG bytes and pixel dimensions.
    pub image: EncodedImage,
}

/// Result of `crop_with_fallback`.
#[derive(Debug, Clone, PartialEq)]
pub struct CropOutcome {
    pub raster: CroppedRaster,
    /// Why the rotated path was abandoned, if it was.
    pub fallback: Option<CropError>,
}

impl CropOutcome {
    pub fn used_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Crop `source` with the selection taken in rotated-surface space.
pub fn create_cropped_image(
    source: &EncodedImage,
    name: &str,
    selection: Selection,
    degrees: f64,
    config: &CropConfig,
) -> Result<CroppedRaster, CropError> {
    let (decoded, _) = decode_image(&source.bytes)?;
    render_and_encode(&decoded, name, selection, degrees, config)
}

/// Crop `source` ignoring rotation.
pub fn create_simple_cropped_image(
    source: &EncodedImage,
    name: &str,
    selection: Selection,
    config: &CropConfig,
) -> Result<CroppedRaster, CropError> {
    create_cropped_image(source, name, selection, 0.0, config)
}

/// Crop `source`, retrying a failed rotated crop once without rotation.
///
/// The source is decoded once; a decode failure is returned directly. If the
/// retry fails as well, the error from the rotated attempt is returned.
pub fn crop_with_fallback(
    source: &EncodedImage,
    name: &str,
    selection: Selection,
    degrees: f64,
    config: &CropConfig,
) -> Result<CropOutcome, CropError> {
    let (decoded, _) = decode_image(&source.bytes)?;

    let err = match render_and_encode(&decoded, name, selection, degrees, config) {
        Ok(raster) => {
            return Ok(CropOutcome {
                raster,
                fallback: None,
            })
        }
        Err(err) => err,
    };

    // An unrotated request already took the simple path.
    if matches!(is_unrotated(degrees), Ok(true)) {
        return Err(err);
    }

    log::warn!(
        "Rotated crop of {} failed ({}), falling back to simple crop",
        name,
        err
    );

    match render_and_encode(&decoded, name, selection, 0.0, config) {
        Ok(raster) => Ok(CropOutcome {
            raster,
            fallback: Some(err),
        }),
        Err(retry_err) => {
            log::debug!("simple crop of {} also failed: {}", name, retry_err);
            Err(err)
        }
    }
}

fn render_and_encode(
    decoded: &DecodedImage,
    name: &str,
    selection: Selection,
    degrees: f64,
    config: &CropConfig,
) -> Result<CroppedRaster, CropError> {
    let export = &config.export;
    let cropped = render(decoded, selection, degrees, export.max_surface_pixels)?;
    let image = encode_image(&cropped, export.quality)?;

    log::debug!(
        "cropped {} to {}x{} ({} bytes)",
        name,
        image.width,
        image.height,
        image.byte_size()
    );

    Ok(CroppedRaster {
        file_name: export.output_name(name),
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::reader::test_support::encoded_gradient;
    use crate::decode::{DecodeError, SourceFormat};
    use image::ImageFormat;

    fn source(width: u32, height: u32) -> EncodedImage {
        EncodedImage {
            bytes: encoded_gradient(width, height, ImageFormat::Png),
            format: SourceFormat::Png,
            width,
            height,
        }
    }

    fn limited_config(max_surface_pixels: u64) -> CropConfig {
        let mut config = CropConfig::default();
        config.export.max_surface_pixels = max_surface_pixels;
        config
    }

    #[test]
    fn test_simple_crop_dimensions_and_name() {
        let raster = create_simple_cropped_image(
            &source(600, 600),
            "photo.jpg",
            Selection::new(100, 50, 400, 500),
            &CropConfig::default(),
        )
        .unwrap();

        assert_eq!(raster.file_name, "cropped-photo.jpg");
        assert_eq!((raster.image.width, raster.image.height), (400, 500));
        assert_eq!(raster.image.format, SourceFormat::Jpeg);

        let (decoded, format) = decode_image(&raster.image.bytes).unwrap();
        assert_eq!(format, SourceFormat::Jpeg);
        assert_eq!((decoded.width, decoded.height), (400, 500));
    }

    #[test]
    fn test_rotated_crop() {
        let raster = create_cropped_image(
            &source(100, 100),
            "a.png",
            Selection::new(0, 0, 141, 141),
            45.0,
            &CropConfig::default(),
        )
        .unwrap();
        assert_eq!((raster.image.width, raster.image.height), (141, 141));
    }

    #[test]
    fn test_undecodable_source() {
        let bad = EncodedImage {
            bytes: b"definitely not an image".to_vec(),
            format: SourceFormat::Other,
            width: 10,
            height: 10,
        };
        let result = crop_with_fallback(
            &bad,
            "x.jpg",
            Selection::full(10, 10),
            30.0,
            &CropConfig::default(),
        );
        assert_eq!(result, Err(CropError::Decode(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_no_fallback_when_rotated_path_succeeds() {
        let outcome = crop_with_fallback(
            &source(100, 100),
            "a.png",
            Selection::new(10, 10, 50, 50),
            10.0,
            &CropConfig::default(),
        )
        .unwrap();

        assert!(!outcome.used_fallback());
        assert_eq!((outcome.raster.image.width, outcome.raster.image.height), (50, 50));
    }

    #[test]
    fn test_fallback_on_surface_failure() {
        // The 141x141 rotated surface exceeds the limit; the 50x50 crop does not.
        let outcome = crop_with_fallback(
            &source(100, 100),
            "a.png",
            Selection::new(0, 0, 50, 50),
            45.0,
            &limited_config(100 * 100),
        )
        .unwrap();

        assert_eq!(
            outcome.fallback,
            Some(CropError::RenderSurfaceUnavailable {
                width: 141,
                height: 141
            })
        );
        assert_eq!(outcome.raster.file_name, "cropped-a.png");
        assert_eq!((outcome.raster.image.width, outcome.raster.image.height), (50, 50));
    }

    #[test]
    fn test_fallback_on_invalid_rotation() {
        let outcome = crop_with_fallback(
            &source(40, 40),
            "a.png",
            Selection::full(40, 40),
            f64::NAN,
            &CropConfig::default(),
        )
        .unwrap();
        assert!(matches!(
            outcome.fallback,
            Some(CropError::InvalidRotation(_))
        ));
    }

    #[test]
    fn test_failed_fallback_returns_original_error() {
        // Too large for the rotated surface, and out of bounds for the source.
        let result = crop_with_fallback(
            &source(100, 100),
            "a.png",
            Selection::new(0, 0, 120, 120),
            45.0,
            &limited_config(100 * 100),
        );
        assert_eq!(
            result,
            Err(CropError::RenderSurfaceUnavailable {
                width: 141,
                height: 141
            })
        );
    }

    #[test]
    fn test_unrotated_failure_not_retried() {
        let result = crop_with_fallback(
            &source(20, 20),
            "a.png",
            Selection::new(10, 10, 20, 20),
            0.0,
            &CropConfig::default(),
        );
        assert!(matches!(result, Err(CropError::InvalidSelection { .. })));
    }

    #[test]
    fn test_custom_prefix() {
        let mut config = CropConfig::default();
        config.export.file_prefix = "ig-".to_string();
        let raster = create_simple_cropped_image(
            &source(10, 10),
            "cat.webp",
            Selection::full(10, 10),
            &config,
        )
        .unwrap();
        assert_eq!(raster.file_name, "ig-cat.webp");
    }
}
