//! Editing session bindings.
//!
//! # Example
//!
//! ```typescript
//! import { JsEditor } from '@fotofix/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const editor = new JsEditor(bytes, canvas.width, canvas.height);
//!
//! editor.apply({ command: 'enter-mode', param: 'contrast' });
//! editor.apply({ command: 'nudge', param: 'up' });
//! editor.apply({ command: 'commit' });
//!
//! const png = editor.working_png();
//! const view = editor.view(); // { x, y, width, height }
//! ```

use fotofix_core::{
    decode_image, encode_png, DisplaySize, Document, EditCommand, EditError, Editor, Outcome,
    Settings,
};
use wasm_bindgen::prelude::*;

/// An image open for editing.
///
/// Stickers are passed as encoded bytes with [`JsEditor::paste_sticker`],
/// since the browser has no file paths. `save` is not available here; use
/// [`JsEditor::baseline_png`] and let the page write the file.
#[wasm_bindgen]
pub struct JsEditor {
    editor: Editor,
    settings: Settings,
}

#[wasm_bindgen]
impl JsEditor {
    /// Decode `bytes` and open them at the given display size.
    #[wasm_bindgen(constructor)]
    pub fn new(bytes: &[u8], display_width: f64, display_height: f64) -> Result<JsEditor, JsValue> {
        Self::open(bytes, DisplaySize::new(display_width, display_height)).map_err(to_js)
    }

    /// Replace settings from a TOML document.
    pub fn load_settings(&mut self, toml: &str) -> Result<(), JsValue> {
        self.settings = Settings::from_toml_str(toml).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(())
    }

    /// Apply a `{ command, param }` object.
    ///
    /// Returns `"changed"`, `"unchanged"`, or `"saved"`.
    pub fn apply(&mut self, command: JsValue) -> Result<String, JsValue> {
        let command: EditCommand = serde_wasm_bindgen::from_value(command)?;
        let outcome = self.apply_command(command).map_err(to_js)?;
        Ok(outcome_name(&outcome).to_string())
    }

    /// Composite an encoded sticker centered on a view-space point and commit.
    pub fn paste_sticker(&mut self, bytes: &[u8], x: f64, y: f64) -> Result<(), JsValue> {
        self.paste_sticker_bytes(bytes, x, y).map_err(to_js)
    }

    pub fn set_display(&mut self, width: f64, height: f64) {
        self.editor
            .document_mut()
            .set_display(DisplaySize::new(width, height));
    }

    /// The image currently shown, as PNG.
    pub fn working_png(&self) -> Result<Vec<u8>, JsValue> {
        self.editor.document().encoded_working().map_err(to_js)
    }

    /// The last committed image, as PNG.
    pub fn baseline_png(&self) -> Result<Vec<u8>, JsValue> {
        encode_png(self.editor.document().baseline()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// On-screen placement as `{ x, y, width, height }`.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.editor.document().view())?)
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.editor.document().working().width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.editor.document().working().height
    }

    /// Active mode name, if any.
    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> Option<String> {
        self.editor.mode().map(|m| m.to_string())
    }

    /// Slider position in `[0, 1]`.
    #[wasm_bindgen(getter)]
    pub fn slider_percent(&self) -> f64 {
        self.editor.slider().percent()
    }

    #[wasm_bindgen(getter)]
    pub fn is_original(&self) -> bool {
        self.editor.document().is_original()
    }

    #[wasm_bindgen(getter)]
    pub fn is_latest(&self) -> bool {
        self.editor.document().is_latest()
    }
}

impl JsEditor {
    fn open(bytes: &[u8], display: DisplaySize) -> Result<Self, EditError> {
        let document = Document::from_bytes(bytes, display)?;
        log::info!(
            "Opened {}x{} image",
            document.working().width,
            document.working().height
        );
        Ok(Self {
            editor: Editor::new(document),
            settings: Settings::default(),
        })
    }

    fn apply_command(&mut self, command: EditCommand) -> Result<Outcome, EditError> {
        self.editor.apply(command, &self.settings)
    }

    fn paste_sticker_bytes(&mut self, bytes: &[u8], x: f64, y: f64) -> Result<(), EditError> {
        let sticker = decode_image(bytes)?;
        let document = self.editor.document_mut();
        document.paste_sticker(&sticker, x, y)?;
        document.commit();
        Ok(())
    }
}

fn outcome_name(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Changed => "changed",
        Outcome::Unchanged => "unchanged",
        Outcome::Saved(_) => "saved",
    }
}

fn to_js(error: EditError) -> JsValue {
    JsValue::from_str(&error.to_string())
}
