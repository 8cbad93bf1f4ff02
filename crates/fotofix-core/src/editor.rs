//! Mode-driven editing session.
//!
//! The [`Editor`] turns [`EditCommand`]s into document operations. It tracks
//! the active mode and the slider, decides which edits commit immediately,
//! and commits pending work when the user leaves a mode.
//!
//! | Commits immediately                          | Pending until commit      |
//! |----------------------------------------------|---------------------------|
//! | invert, grayscale, rotate, select-and-mask, sticker | adjust, pixelate, crop, zoom |

use std::path::{Path, PathBuf};

use crate::command::{Direction, EditCommand, Mode};
use crate::decode::open_image;
use crate::document::Document;
use crate::error::EditError;
use crate::settings::Settings;
use crate::transform::DisplaySize;

/// Result of applying one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The working image, view or history changed.
    Changed,
    /// Nothing to do, e.g. undo on the original image.
    Unchanged,
    /// The committed image was written to this path.
    Saved(PathBuf),
}

/// Slider value in `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider {
    value: f64,
    min: f64,
    max: f64,
}

impl Slider {
    pub const DEFAULT: f64 = 1.0;

    pub fn new(value: f64, min: f64, max: f64) -> Self {
        Self {
            value: value.clamp(min, max),
            min,
            max,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Move by `delta` as a fraction of the range.
    pub fn nudge(&mut self, delta: f64) -> f64 {
        self.value = (self.value + delta * (self.max - self.min)).clamp(self.min, self.max);
        self.value
    }

    pub fn reset(&mut self) {
        self.value = Self::DEFAULT.clamp(self.min, self.max);
    }

    /// Position in the range, 0 at `min` and 1 at `max`.
    pub fn percent(&self) -> f64 {
        (self.value - self.min) / (self.max - self.min)
    }

    /// Pixelation factor: slider 1 maps to 0 and 4 maps to 1.
    pub fn pixelate_factor(&self) -> f64 {
        ((self.value - 1.0) / 3.0).clamp(0.0, 1.0)
    }
}

impl Default for Slider {
    fn default() -> Self {
        Self::new(Self::DEFAULT, 0.0, 4.0)
    }
}

#[derive(Debug, Clone)]
pub struct Editor {
    document: Document,
    source: Option<PathBuf>,
    mode: Option<Mode>,
    slider: Slider,
}

impl Editor {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            source: None,
            mode: None,
            slider: Slider::default(),
        }
    }

    /// Open an image file. Saves are written next to it.
    pub fn open(path: impl AsRef<Path>, display: DisplaySize) -> Result<Self, EditError> {
        let path = path.as_ref();
        let document = Document::open(path, display)?;
        log::info!(
            "Opened {} ({}x{})",
            path.display(),
            document.working().width,
            document.working().height
        );
        Ok(Self::new(document).with_source(path))
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn slider(&self) -> Slider {
        self.slider
    }

    /// Apply one command.
    ///
    /// Undo and redo at a history boundary report [`Outcome::Unchanged`].
    /// Any other error leaves the document as it was.
    pub fn apply(&mut self, command: EditCommand, settings: &Settings) -> Result<Outcome, EditError> {
        log::debug!("Applying {:?}", command);

        match command {
            EditCommand::EnterMode(mode) => self.enter_mode(mode, settings),
            EditCommand::Undo => self.step_history(Document::undo),
            EditCommand::Redo => self.step_history(Document::redo),
            EditCommand::Commit => Ok(self.commit_pending()),
            EditCommand::Adjust { kind, factor } => {
                self.document.adjust(kind, factor)?;
                Ok(Outcome::Changed)
            }
            EditCommand::Crop(insets) => {
                self.document.crop(insets)?;
                Ok(Outcome::Changed)
            }
            EditCommand::Rotate { angle, update_dims } => {
                self.document.rotate(angle, update_dims, settings.rotate_filter)?;
                self.document.commit();
                Ok(Outcome::Changed)
            }
            EditCommand::Zoom { delta_w, delta_h } => {
                self.document.zoom(delta_w, delta_h)?;
                Ok(Outcome::Changed)
            }
            EditCommand::SelectAndMask { x, y, threshold } => {
                let threshold = threshold.unwrap_or(settings.transparency_threshold);
                self.document.select_and_mask(x, y, threshold)?;
                self.document.commit();
                Ok(Outcome::Changed)
            }
            EditCommand::PasteSticker { path, x, y } => {
                let sticker = open_image(&path)?;
                self.document.paste_sticker(&sticker, x, y)?;
                self.document.commit();
                Ok(Outcome::Changed)
            }
            EditCommand::Invert => {
                self.document.invert();
                self.document.commit();
                Ok(Outcome::Changed)
            }
            EditCommand::Grayscale => {
                self.document.grayscale();
                self.document.commit();
                Ok(Outcome::Changed)
            }
            EditCommand::Pixelate { factor } => {
                self.document.pixelate(factor)?;
                Ok(Outcome::Changed)
            }
            EditCommand::Save => self.save(settings),
            EditCommand::Nudge(direction) => self.nudge(direction, settings),
        }
    }

    fn enter_mode(&mut self, mode: Mode, settings: &Settings) -> Result<Outcome, EditError> {
        let previous = self.mode.replace(mode);
        let mut outcome = Outcome::Unchanged;

        if previous != Some(mode) {
            if previous.is_some_and(Mode::uses_slider) {
                self.slider.reset();
            }
            outcome = self.commit_pending();
        }

        // Entering these modes is the action itself
        match mode {
            Mode::Invert => {
                self.document.invert();
                self.document.commit();
                outcome = Outcome::Changed;
            }
            Mode::Grayscale => {
                self.document.grayscale();
                self.document.commit();
                outcome = Outcome::Changed;
            }
            Mode::Rotate if previous == Some(Mode::Rotate) => {
                self.document.rotate(90.0, true, settings.rotate_filter)?;
                self.document.commit();
                outcome = Outcome::Changed;
            }
            _ => {}
        }

        Ok(outcome)
    }

    fn commit_pending(&mut self) -> Outcome {
        if self.document.has_pending_changes() {
            self.document.commit();
            Outcome::Changed
        } else {
            Outcome::Unchanged
        }
    }

    fn step_history(
        &mut self,
        step: fn(&mut Document) -> Result<(), EditError>,
    ) -> Result<Outcome, EditError> {
        match step(&mut self.document) {
            Ok(()) => Ok(Outcome::Changed),
            Err(e) if e.is_history_boundary() => {
                log::info!("{}", e);
                Ok(Outcome::Unchanged)
            }
            Err(e) => Err(e),
        }
    }

    fn save(&mut self, settings: &Settings) -> Result<Outcome, EditError> {
        let source = self
            .source
            .as_deref()
            .ok_or_else(|| EditError::invalid("save", "the document has no source file"))?;
        let path = self.document.save(source, &settings.save_suffix)?;
        Ok(Outcome::Saved(path))
    }

    fn nudge(&mut self, direction: Direction, settings: &Settings) -> Result<Outcome, EditError> {
        match self.mode {
            Some(Mode::Pixelate) => {
                self.slider.nudge(direction.sign() * settings.slider_delta);
                self.document.pixelate(self.slider.pixelate_factor())?;
                Ok(Outcome::Changed)
            }
            Some(mode) if mode.uses_slider() => {
                let value = self.slider.nudge(direction.sign() * settings.slider_delta);
                if let Some(kind) = mode.enhancement() {
                    self.document.adjust(kind, value as f32)?;
                }
                Ok(Outcome::Changed)
            }
            Some(Mode::Zoom) => {
                let display = self.document.display();
                let step = direction.sign() * settings.zoom_delta;
                self.document.zoom(step * display.width, step * display.height)?;
                Ok(Outcome::Changed)
            }
            _ => {
                log::debug!("Nudge ignored in mode {:?}", self.mode);
                Ok(Outcome::Unchanged)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjustments::Enhancement;
    use crate::raster::RasterImage;
    use crate::transform::CropInsets;

    const DISPLAY: DisplaySize = DisplaySize {
        width: 400.0,
        height: 300.0,
    };

    fn editor() -> Editor {
        let mut pixels = Vec::new();
        for y in 0..8u32 {
            for x in 0..8u32 {
                pixels.extend_from_slice(&[(x * 30) as u8, (y * 30) as u8, 90, 255]);
            }
        }
        Editor::new(Document::new(RasterImage::new(8, 8, pixels), DISPLAY))
    }

    fn settings() -> Settings {
        Settings::default()
    }

    #[test]
    fn test_slider_nudge_and_clamp() {
        let mut s = Slider::default();
        assert!((s.nudge(0.1) - 1.4).abs() < 1e-9);
        s.nudge(10.0);
        assert_eq!(s.value(), 4.0);
        s.nudge(-10.0);
        assert_eq!(s.value(), 0.0);
        s.reset();
        assert_eq!(s.value(), 1.0);
    }

    #[test]
    fn test_slider_pixelate_mapping() {
        assert_eq!(Slider::new(1.0, 0.0, 4.0).pixelate_factor(), 0.0);
        assert_eq!(Slider::new(4.0, 0.0, 4.0).pixelate_factor(), 1.0);
        assert_eq!(Slider::new(2.5, 0.0, 4.0).pixelate_factor(), 0.5);
        assert_eq!(Slider::new(0.0, 0.0, 4.0).pixelate_factor(), 0.0);
    }

    #[test]
    fn test_undo_at_origin_is_unchanged() {
        let mut e = editor();
        assert_eq!(e.apply(EditCommand::Undo, &settings()).unwrap(), Outcome::Unchanged);
        assert_eq!(e.apply(EditCommand::Redo, &settings()).unwrap(), Outcome::Unchanged);
    }

    #[test]
    fn test_invert_commits_immediately() {
        let mut e = editor();
        e.apply(EditCommand::Invert, &settings()).unwrap();
        assert!(!e.document().is_original());
        assert!(!e.document().has_pending_changes());
    }

    #[test]
    fn test_adjust_stays_pending_until_mode_switch() {
        let mut e = editor();
        let s = settings();
        e.apply(EditCommand::EnterMode(Mode::Brightness), &s).unwrap();
        e.apply(
            EditCommand::Adjust {
                kind: Enhancement::Brightness,
                factor: 1.5,
            },
            &s,
        )
        .unwrap();
        assert!(e.document().has_pending_changes());
        assert!(e.document().is_original());

        e.apply(EditCommand::EnterMode(Mode::Crop), &s).unwrap();
        assert!(!e.document().has_pending_changes());
        assert_eq!(e.document().timeline().len(), 2);
    }

    #[test]
    fn test_mode_switch_without_changes_does_not_commit() {
        let mut e = editor();
        let s = settings();
        assert_eq!(
            e.apply(EditCommand::EnterMode(Mode::Contrast), &s).unwrap(),
            Outcome::Unchanged
        );
        e.apply(EditCommand::EnterMode(Mode::Crop), &s).unwrap();
        assert_eq!(e.document().timeline().len(), 1);
    }

    #[test]
    fn test_nudge_in_slider_mode() {
        let mut e = editor();
        let s = settings();
        e.apply(EditCommand::EnterMode(Mode::Brightness), &s).unwrap();
        e.apply(EditCommand::Nudge(Direction::Down), &s).unwrap();
        assert!((e.slider().value() - 0.6).abs() < 1e-9);
        assert!(e.document().has_pending_changes());
        assert!(e.document().working().pixel(7, 7).unwrap()[0] < 210);
    }

    #[test]
    fn test_slider_resets_after_leaving_mode() {
        let mut e = editor();
        let s = settings();
        e.apply(EditCommand::EnterMode(Mode::Saturation), &s).unwrap();
        e.apply(EditCommand::Nudge(Direction::Up), &s).unwrap();
        e.apply(EditCommand::EnterMode(Mode::Zoom), &s).unwrap();
        assert_eq!(e.slider().value(), Slider::DEFAULT);
    }

    #[test]
    fn test_nudge_pixelate_from_default_is_identity() {
        let mut e = editor();
        let s = settings();
        e.apply(EditCommand::EnterMode(Mode::Pixelate), &s).unwrap();
        e.apply(EditCommand::Nudge(Direction::Down), &s).unwrap();
        // Slider 0.6 maps below factor 0, clamped to 0
        assert_eq!(e.document().working(), e.document().baseline());
        e.apply(EditCommand::Nudge(Direction::Up), &s).unwrap();
        e.apply(EditCommand::Nudge(Direction::Up), &s).unwrap();
        assert_ne!(e.document().working(), e.document().baseline());
    }

    #[test]
    fn test_nudge_zoom_uses_display_fraction() {
        let mut e = editor();
        let s = settings();
        e.apply(EditCommand::EnterMode(Mode::Zoom), &s).unwrap();
        e.apply(EditCommand::Nudge(Direction::Up), &s).unwrap();
        // ratio = min(0.07 * 400 / 8, 0.07 * 300 / 8) = 2.625
        let view = e.document().view();
        assert!((view.width - 8.0 * 3.625).abs() < 1e-9);
    }

    #[test]
    fn test_nudge_outside_slider_mode() {
        let mut e = editor();
        assert_eq!(
            e.apply(EditCommand::Nudge(Direction::Up), &settings()).unwrap(),
            Outcome::Unchanged
        );
    }

    #[test]
    fn test_reentering_rotate_turns_image() {
        let mut e = Editor::new(Document::new(RasterImage::filled(6, 2, [1, 2, 3, 255]), DISPLAY));
        let s = settings();
        e.apply(EditCommand::EnterMode(Mode::Rotate), &s).unwrap();
        assert_eq!(e.document().working().width, 6);
        e.apply(EditCommand::EnterMode(Mode::Rotate), &s).unwrap();
        assert_eq!((e.document().working().width, e.document().working().height), (2, 6));
        assert!(!e.document().has_pending_changes());
    }

    #[test]
    fn test_rotate_reentry_reports_each_turn() {
        let display = DisplaySize::new(101.0, 77.0);
        let mut e = Editor::new(Document::new(RasterImage::filled(31, 10, [5, 6, 7, 255]), display));
        let s = settings();
        let start = e.document().view();

        e.apply(EditCommand::EnterMode(Mode::Rotate), &s).unwrap();
        for _ in 0..4 {
            let outcome = e.apply(EditCommand::EnterMode(Mode::Rotate), &s).unwrap();
            assert_eq!(outcome, Outcome::Changed);
        }
        assert_eq!(e.document().view(), start);
        assert_eq!(e.document().timeline().len(), 5);
    }

    #[test]
    fn test_enter_grayscale_mode_applies() {
        let mut e = editor();
        let outcome = e.apply(EditCommand::EnterMode(Mode::Grayscale), &settings()).unwrap();
        assert_eq!(outcome, Outcome::Changed);
        let px = e.document().working().pixel(3, 5).unwrap();
        assert!(px[0] == px[1] && px[1] == px[2]);
    }

    #[test]
    fn test_select_and_mask_uses_configured_threshold() {
        let mut e = Editor::new(Document::new(RasterImage::filled(4, 4, [9, 9, 9, 255]), DISPLAY));
        e.apply(
            EditCommand::SelectAndMask {
                x: 0.0,
                y: 0.0,
                threshold: None,
            },
            &settings(),
        )
        .unwrap();
        assert!(e.document().working().pixels.chunks_exact(4).all(|px| px[3] == 0));
        assert_eq!(e.document().timeline().len(), 2);
    }

    #[test]
    fn test_failed_command_leaves_document() {
        let mut e = editor();
        let before = e.document().working().clone();
        let result = e.apply(
            EditCommand::Crop(CropInsets::new(-1.0, 0.0, 0.0, 0.0)),
            &settings(),
        );
        assert!(result.is_err());
        assert_eq!(e.document().working(), &before);
    }

    #[test]
    fn test_missing_sticker_file() {
        let mut e = editor();
        let result = e.apply(
            EditCommand::PasteSticker {
                path: PathBuf::from("/no/such/sticker.png"),
                x: 4.0,
                y: 4.0,
            },
            &settings(),
        );
        assert!(matches!(result, Err(EditError::Decode(_))));
        assert!(e.document().is_original());
    }

    #[test]
    fn test_save_without_source() {
        let mut e = editor();
        assert!(e.apply(EditCommand::Save, &settings()).is_err());
    }

    #[test]
    fn test_save_with_source() {
        let dir = std::env::temp_dir().join(format!("fotofix-editor-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut e = editor().with_source(dir.join("pic.jpg"));
        let mut s = settings();
        s.save_suffix = "edit".to_string();

        let outcome = e.apply(EditCommand::Save, &s).unwrap();
        assert_eq!(outcome, Outcome::Saved(dir.join("pic_edit.png")));
        assert!(dir.join("pic_edit.png").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
