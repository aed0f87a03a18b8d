//! Multi-format decoding with EXIF orientation handling.
//!
//! Browsers honour EXIF orientation when drawing an image, so the natural
//! dimensions the user sees (and the selection rectangle the UI reports) are
//! the oriented ones. Decoding applies the same correction.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageError, ImageReader};

use super::{DecodeError, DecodedImage, Orientation, SourceFormat};

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// The format is sniffed from the content; file names and MIME types are not
/// consulted.
///
/// # Errors
///
/// - `DecodeError::Empty` for an empty buffer
/// - `DecodeError::InvalidFormat` if the content is not a supported format
/// - `DecodeError::CorruptedFile` if decoding fails part-way
/// - `DecodeError::ZeroSize` if the image has no pixels
pub fn decode_image(bytes: &[u8]) -> Result<(DecodedImage, SourceFormat), DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let format = reader
        .format()
        .map(SourceFormat::from_image_format)
        .ok_or(DecodeError::InvalidFormat)?;

    let img = reader.decode().map_err(map_image_error)?;
    let img = apply_orientation(img, orientation);

    let decoded = DecodedImage::from_rgb_image(flatten_onto_black(img));
    if decoded.width == 0 || decoded.height == 0 {
        return Err(DecodeError::ZeroSize {
            width: decoded.width,
            height: decoded.height,
        });
    }

    log::debug!(
        "decoded {:?} image {}x{} ({:?})",
        format,
        decoded.width,
        decoded.height,
        orientation
    );

    Ok((decoded, format))
}

/// Convert to RGB, compositing any alpha over black the way a JPEG export of
/// a transparent canvas does.
fn flatten_onto_black(img: DynamicImage) -> image::RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }

    let rgba = img.into_rgba8();
    image::RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let scale = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
        image::Rgb([scale(r), scale(g), scale(b)])
    })
}

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    }
}

/// EXIF orientation of the buffer, `Normal` when absent or unreadable.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
