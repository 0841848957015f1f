//! WebAssembly bindings for the Quire document studio.
//!
//! The browser keeps the editing surface, the preview frame and the
//! pagination engine. This crate holds the document state behind one handle,
//! [`QuireEditor`], and UI callbacks become thin calls on it.
//!
//! ## Module Structure
//!
//! - [`editor`] - `QuireEditor`, the shared editor state handle
//! - [`error`] - Error types with JavaScript interop
//!
//! # Example
//!
//! ```javascript
//! import init, { QuireEditor } from '@quire/wasm';
//!
//! await init();
//!
//! const editor = new QuireEditor();
//! editor.uploadImages([file.name], [new Uint8Array(await file.arrayBuffer())]);
//! const [image] = editor.imageList();
//! editor.setSource('structure', editor.imageMarkup(image.id));
//!
//! frame.srcdoc = editor.assemble();
//! const zip = editor.exportArchive();
//! ```
//!
//! # WASM Compatibility Notes
//!
//! Image identifiers use `getrandom` with the `wasm_js` feature, which calls
//! into `crypto.getRandomValues()`.

mod editor;
mod error;

pub use editor::QuireEditor;
pub use error::{ErrorCode, QuireError};

use wasm_bindgen::prelude::*;

/// Initialize the WASM module.
///
/// This function sets up panic hooks for better error messages in the browser console.
/// It is called automatically when using wasm-pack's generated JavaScript.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the version of the quire-wasm library.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
