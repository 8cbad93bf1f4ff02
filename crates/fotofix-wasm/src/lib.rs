//! Fotofix WASM - WebAssembly bindings for Fotofix
//!
//! This crate exposes the fotofix-core editing session to JavaScript.
//!
//! # Module Structure
//!
//! - `editor` - [`JsEditor`], an image open for editing
//! - `logger` - routes core log records to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditor, set_log_level } from '@fotofix/wasm';
//!
//! await init();
//! set_log_level('debug');
//!
//! const editor = new JsEditor(bytes, 800, 600);
//! editor.apply({ command: 'grayscale' });
//! ```

use wasm_bindgen::prelude::*;

mod editor;
mod logger;

pub use editor::JsEditor;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Info);
}

/// Set the console log level: `off`, `error`, `warn`, `info`, `debug` or `trace`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    logger::install(logger::parse_level(level));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
