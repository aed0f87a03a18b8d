//! Aspect classification bindings.
//!
//! These use the stock target set (1:1, 4:5, 1.91:1, tolerance 0.02). A
//! session created with a custom configuration classifies its own uploads.

use crate::types::{to_js_error, JsAspectClass};
use aspectcrop_core::config::AspectConfig;
use aspectcrop_core::{aspect_label as core_label, classify};
use wasm_bindgen::prelude::*;

/// Classify an image by its pixel dimensions.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const aspect = classify_aspect(img.naturalWidth, img.naturalHeight);
/// if (!aspect.is_accepted) {
///   openCropper(aspect.nearest_value);
/// }
/// ```
#[wasm_bindgen]
pub fn classify_aspect(width: u32, height: u32) -> Result<JsAspectClass, JsValue> {
    classify(width, height, &AspectConfig::default())
        .map(|class| JsAspectClass::from(&class))
        .map_err(to_js_error)
}

/// Badge text for a ratio: "1:1", "4:5", "1.91:1", or the ratio to two decimals.
#[wasm_bindgen]
pub fn aspect_label(ratio: f64) -> String {
    core_label(ratio, &AspectConfig::default())
}
