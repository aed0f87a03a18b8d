//! WASM-compatible wrapper types.
//!
//! These mirror the core session and classification types with
//! JavaScript-friendly getters. Byte buffers are copied out to JavaScript as
//! `Uint8Array` on access.

use aspectcrop_core::session::{CropReport, Download, ImageRecord};
use aspectcrop_core::AspectClass;
use wasm_bindgen::prelude::*;

/// Convert any displayable error into a JavaScript error string.
pub(crate) fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Aspect classification result.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsAspectClass {
    ratio: f64,
    is_accepted: bool,
    nearest_name: String,
    nearest_description: String,
    nearest_value: f64,
}

#[wasm_bindgen]
impl JsAspectClass {
    #[wasm_bindgen(getter)]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    #[wasm_bindgen(getter)]
    pub fn is_accepted(&self) -> bool {
        self.is_accepted
    }

    /// Short name of the closest target, e.g. "4:5".
    #[wasm_bindgen(getter)]
    pub fn nearest_name(&self) -> String {
        self.nearest_name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn nearest_description(&self) -> String {
        self.nearest_description.clone()
    }

    /// Ratio to lock the crop selection to.
    #[wasm_bindgen(getter)]
    pub fn nearest_value(&self) -> f64 {
        self.nearest_value
    }
}

impl From<&AspectClass> for JsAspectClass {
    fn from(class: &AspectClass) -> Self {
        Self {
            ratio: class.ratio,
            is_accepted: class.is_accepted,
            nearest_name: class.nearest.name.clone(),
            nearest_description: class.nearest.description.clone(),
            nearest_value: class.nearest.value,
        }
    }
}

/// Snapshot of one image in the session.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsImageInfo {
    id: u32,
    name: String,
    size: usize,
    width: u32,
    height: u32,
    original_width: u32,
    original_height: u32,
    aspect: JsAspectClass,
    needs_crop: bool,
    cropped_width: Option<u32>,
    cropped_height: Option<u32>,
}

#[wasm_bindgen]
impl JsImageInfo {
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.name.clone()
    }

    /// Upload size in bytes.
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Width of the source the selection is made on.
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn original_width(&self) -> u32 {
        self.original_width
    }

    #[wasm_bindgen(getter)]
    pub fn original_height(&self) -> u32 {
        self.original_height
    }

    /// Whether the upload was downsampled before cropping.
    #[wasm_bindgen(getter)]
    pub fn resized(&self) -> bool {
        self.width != self.original_width || self.height != self.original_height
    }

    #[wasm_bindgen(getter)]
    pub fn aspect(&self) -> JsAspectClass {
        self.aspect.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn needs_crop(&self) -> bool {
        self.needs_crop
    }

    #[wasm_bindgen(getter)]
    pub fn has_crop(&self) -> bool {
        self.cropped_width.is_some()
    }

    #[wasm_bindgen(getter)]
    pub fn cropped_width(&self) -> Option<u32> {
        self.cropped_width
    }

    #[wasm_bindgen(getter)]
    pub fn cropped_height(&self) -> Option<u32> {
        self.cropped_height
    }
}

impl From<&ImageRecord> for JsImageInfo {
    fn from(record: &ImageRecord) -> Self {
        let cropped = record.cropped.as_ref().map(|c| &c.image);
        Self {
            id: record.id.get(),
            name: record.name.clone(),
            size: record.size,
            width: record.source.width,
            height: record.source.height,
            original_width: record.original_width,
            original_height: record.original_height,
            aspect: JsAspectClass::from(&record.aspect),
            needs_crop: record.needs_crop(),
            cropped_width: cropped.map(|img| img.width),
            cropped_height: cropped.map(|img| img.height),
        }
    }
}

/// Result of cropping one image.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsCropResult {
    id: u32,
    width: u32,
    height: u32,
    byte_size: usize,
    fallback_reason: Option<String>,
}

#[wasm_bindgen]
impl JsCropResult {
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    /// Whether rotation was dropped to produce this crop.
    #[wasm_bindgen(getter)]
    pub fn used_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }

    /// Why the rotated crop failed, when `used_fallback` is true.
    #[wasm_bindgen(getter)]
    pub fn fallback_reason(&self) -> Option<String> {
        self.fallback_reason.clone()
    }
}

impl From<CropReport> for JsCropResult {
    fn from(report: CropReport) -> Self {
        Self {
            id: report.id.get(),
            width: report.width,
            height: report.height,
            byte_size: report.byte_size,
            fallback_reason: report.fallback.map(|e| e.to_string()),
        }
    }
}

/// One file of the batch download.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsDownload {
    id: u32,
    file_name: String,
    mime_type: &'static str,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl JsDownload {
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    /// MIME type of the file, for building a `Blob`.
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.mime_type.to_string()
    }

    /// Returns the file bytes as Uint8Array.
    ///
    /// Note: This creates a copy of the data.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl From<Download<'_>> for JsDownload {
    fn from(download: Download<'_>) -> Self {
        Self {
            id: download.id.get(),
            file_name: download.file_name.to_string(),
            mime_type: download.image.format.mime_type(),
            bytes: download.image.bytes.clone(),
        }
    }
}
