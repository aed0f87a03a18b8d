//! Image decoding and source preparation.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG, GIF and WebP uploads with EXIF orientation applied
//! - Downsampling oversized uploads before cropping
//!
//! # Architecture
//!
//! All operations are synchronous and single-threaded. In the browser they
//! run inside WASM, usually from a Web Worker.
//!
//! # Examples
//!
//! ```ignore
//! use aspectcrop_core::decode::{prepare_source, decode_image};
//! use aspectcrop_core::config::ResizeConfig;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let prepared = prepare_source(bytes, &ResizeConfig::default()).unwrap();
//! let (image, _) = decode_image(&prepared.source.bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

pub(crate) mod reader;
mod resize;
mod types;

pub use reader::{decode_image, get_orientation};
pub use resize::{
    fit_dimensions, needs_resize, prepare_source, resize, resize_exact, PreparedSource,
};
pub use types::{DecodeError, DecodedImage, EncodedImage, FilterType, Orientation, SourceFormat};
