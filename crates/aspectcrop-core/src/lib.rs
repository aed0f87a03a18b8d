//! AspectCrop Core - aspect-ratio checking and cropping
//!
//! This crate provides the image logic behind AspectCrop: classifying uploads
//! against a set of accepted aspect ratios, downsampling oversized sources,
//! and producing rotated or unrotated crops as JPEG.
//!
//! # Flow
//!
//! 1. [`session::ImageRegistry::add`] decodes and downsamples an upload and
//!    classifies it with [`aspect::classify`].
//! 2. Rejected images are cropped with [`session::ImageRegistry::crop`],
//!    which goes through [`export::crop_with_fallback`].
//! 3. [`session::ImageRegistry::downloads`] lists the files to hand back.

pub mod aspect;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod export;
pub mod session;
pub mod transform;

pub use aspect::{aspect_label, classify, classify_ratio, AspectClass};
pub use config::{
    AspectConfig, AspectTarget, ConfigError, CropConfig, ExportConfig, ResizeConfig,
};
pub use error::{CropError, ResizeError};
pub use export::{
    create_cropped_image, create_simple_cropped_image, crop_with_fallback, CropOutcome,
    CroppedRaster,
};
pub use session::{CropReport, Download, ImageId, ImageRecord, ImageRegistry, SessionError, Summary};
pub use transform::{render, rotated_bounds, Selection};
