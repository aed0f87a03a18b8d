//! Image encoding for aspectcrop.
//!
//! Both the downsampled source and the cropped result are stored as JPEG.
//! The resizer encodes at a lower quality factor than the final export,
//! since only the export is handed to the user.
//!
//! # Examples
//!
//! ```ignore
//! use aspectcrop_core::encode::encode_jpeg;
//!
//! let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
//! let jpeg_bytes = encode_jpeg(&pixels, 100, 100, 0.95).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod jpeg;

pub use jpeg::{encode_image, encode_jpeg, quality_percent, EncodeError};
