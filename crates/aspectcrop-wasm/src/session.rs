//! Crop session bindings.
//!
//! `JsCropSession` owns every uploaded image and crop for one page. Bytes
//! come in from `File.arrayBuffer()` and go out as `Uint8Array` copies.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const session = new JsCropSession({ export: { quality: 0.9 } });
//!
//! for (const file of files) {
//!   const info = session.add_image(file.name, new Uint8Array(await file.arrayBuffer()));
//!   if (info.needs_crop) queue.push(info.id);
//! }
//!
//! const result = session.crop_image(id, area.x, area.y, area.width, area.height, rotation);
//! if (result.used_fallback) console.warn(result.fallback_reason);
//!
//! if (session.summary().all_complete) {
//!   for (const d of session.downloads()) save(d.file_name, d.bytes());
//! }
//! ```

use crate::types::{to_js_error, JsCropResult, JsDownload, JsImageInfo};
use aspectcrop_core::config::CropConfig;
use aspectcrop_core::session::{ImageId, ImageRegistry, SessionError, Summary};
use aspectcrop_core::transform::Selection;
use wasm_bindgen::prelude::*;

/// One page's worth of uploaded images.
#[wasm_bindgen]
pub struct JsCropSession {
    registry: ImageRegistry,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Create a session. `config` may be `undefined`, `null`, or a partial
    /// configuration object; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the object does not deserialize or fails validation.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCropSession, JsValue> {
        let config: CropConfig = if config.is_undefined() || config.is_null() {
            CropConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid configuration: {}", e)))?
        };
        Self::with_config(config).map_err(to_js_error)
    }

    /// Decode, downsample and classify an upload.
    pub fn add_image(&mut self, name: &str, bytes: Vec<u8>) -> Result<JsImageInfo, JsValue> {
        self.try_add_image(name, bytes).map_err(to_js_error)
    }

    /// Crop an image. `x`, `y`, `width` and `height` are pixels on the rotated
    /// surface; `rotation` is in degrees, positive = clockwise.
    ///
    /// The selection must lie inside `rotated_surface_size(width, height,
    /// rotation)`. That size is truncated, so a UI that rounds its selection
    /// has to clamp it first; an overhanging selection is an error, not clipped.
    ///
    /// If the rotated crop fails it is retried without rotation; the result
    /// then reports `used_fallback`.
    pub fn crop_image(
        &mut self,
        id: u32,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rotation: f64,
    ) -> Result<JsCropResult, JsValue> {
        self.try_crop_image(id, Selection::new(x, y, width, height), rotation)
            .map_err(to_js_error)
    }

    /// Remove an image and free its buffers.
    pub fn remove_image(&mut self, id: u32) -> Result<(), JsValue> {
        self.registry
            .remove(ImageId::from(id))
            .map(drop)
            .map_err(to_js_error)
    }

    /// Discard an image's crop. Returns whether there was one.
    pub fn clear_crop(&mut self, id: u32) -> Result<bool, JsValue> {
        self.registry
            .clear_crop(ImageId::from(id))
            .map_err(to_js_error)
    }

    /// Snapshot of one image, or `undefined` for an unknown id.
    pub fn image(&self, id: u32) -> Option<JsImageInfo> {
        self.registry.get(ImageId::from(id)).map(JsImageInfo::from)
    }

    /// Ids of all images in upload order.
    pub fn image_ids(&self) -> Vec<u32> {
        self.registry.records().iter().map(|r| r.id.get()).collect()
    }

    /// Progress counters as a plain object:
    /// `{ total, accepted, cropped, pending, all_complete, progress_percent }`.
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.summary_inner()).map_err(to_js_error)
    }

    /// Every image ready for export: crops, plus accepted uploads as-is.
    pub fn downloads(&self) -> js_sys::Array {
        self.download_list().into_iter().map(JsValue::from).collect()
    }

    /// JPEG bytes of an image's crop, if it has one.
    pub fn cropped_bytes(&self, id: u32) -> Option<Vec<u8>> {
        self.registry
            .get(ImageId::from(id))
            .and_then(|r| r.cropped.as_ref())
            .map(|c| c.image.bytes.clone())
    }

    /// Bytes of the source the selection is made on (downsampled if large).
    pub fn source_bytes(&self, id: u32) -> Option<Vec<u8>> {
        self.registry
            .get(ImageId::from(id))
            .map(|r| r.source.bytes.clone())
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.registry.len()
    }
}

impl JsCropSession {
    pub(crate) fn with_config(config: CropConfig) -> Result<Self, SessionError> {
        Ok(Self {
            registry: ImageRegistry::new(config)?,
        })
    }

    pub(crate) fn try_add_image(
        &mut self,
        name: &str,
        bytes: Vec<u8>,
    ) -> Result<JsImageInfo, SessionError> {
        self.registry.add(name, bytes).map(JsImageInfo::from)
    }

    pub(crate) fn try_crop_image(
        &mut self,
        id: u32,
        selection: Selection,
        rotation: f64,
    ) -> Result<JsCropResult, SessionError> {
        self.registry
            .crop(ImageId::from(id), selection, rotation)
            .map(JsCropResult::from)
    }

    pub(crate) fn summary_inner(&self) -> Summary {
        self.registry.summary()
    }

    pub(crate) fn download_list(&self) -> Vec<JsDownload> {
        self.registry
            .downloads()
            .into_iter()
            .map(JsDownload::from)
            .collect()
    }
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_new_with_undefined_config() {
        let session = JsCropSession::new(JsValue::UNDEFINED).unwrap();
        assert_eq!(session.length(), 0);
    }

    #[wasm_bindgen_test]
    fn test_new_with_partial_config() {
        let config = js_sys::JSON::parse(r#"{"export":{"file_prefix":"x-"}}"#).unwrap();
        assert!(JsCropSession::new(config).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_new_with_invalid_config() {
        let config = js_sys::JSON::parse(r#"{"aspect":{"tolerance":-1}}"#).unwrap();
        assert!(JsCropSession::new(config).is_err());
    }

    #[wasm_bindgen_test]
    fn test_summary_is_object() {
        let session = JsCropSession::new(JsValue::NULL).unwrap();
        let summary = session.summary().unwrap();
        let total = js_sys::Reflect::get(&summary, &JsValue::from_str("total")).unwrap();
        assert_eq!(total.as_f64(), Some(0.0));
    }

    #[wasm_bindgen_test]
    fn test_remove_unknown_is_error() {
        let mut session = JsCropSession::new(JsValue::UNDEFINED).unwrap();
        assert!(session.remove_image(7).is_err());
    }
}
