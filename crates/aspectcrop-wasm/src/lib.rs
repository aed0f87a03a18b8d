//! AspectCrop WASM - WebAssembly bindings for AspectCrop
//!
//! This crate exposes aspectcrop-core to the browser UI. The file picker,
//! cropper widget and thumbnails stay in JavaScript; decoding, resizing,
//! classification and the crop itself happen here.
//!
//! # Module Structure
//!
//! - `aspect` - Aspect classification with the stock targets
//! - `session` - `JsCropSession`, the per-page image list
//! - `transform` - Rotated surface geometry for the cropper
//! - `types` - WASM-compatible wrapper types
//! - `logging` - Console backend for the `log` facade
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropSession, classify_aspect } from '@aspectcrop/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new JsCropSession(undefined);
//! const info = session.add_image(file.name, new Uint8Array(await file.arrayBuffer()));
//! console.log(`${info.name}: ${info.aspect.nearest_name}, crop needed: ${info.needs_crop}`);
//! ```

use wasm_bindgen::prelude::*;

mod aspect;
mod logging;
mod session;
mod transform;
mod types;

pub use aspect::{aspect_label, classify_aspect};
pub use logging::set_log_level;
pub use session::JsCropSession;
pub use transform::rotated_surface_size;
pub use types::{JsAspectClass, JsCropResult, JsDownload, JsImageInfo};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::install(log::LevelFilter::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
