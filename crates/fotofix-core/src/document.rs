//! The document being edited.
//!
//! A document holds the last committed image (`baseline`), a tentative
//! `working` image produced by the active operation, the on-screen view, and
//! the undo/redo timeline.
//!
//! Operations fall into two groups:
//!
//! - **Replaying** (adjust, crop, rotate, pixelate) always start again from
//!   `baseline` and the view the baseline was displayed at. Calling them
//!   repeatedly with different parameters never compounds.
//! - **Accumulating** (transparency, highlight, sticker, invert, grayscale)
//!   act on the current `working` image and keep the view.
//!
//! Nothing reaches the history until [`Document::commit`]. A failed
//! operation leaves the document exactly as it was.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adjustments::{enhance, Enhancement};
use crate::composite;
use crate::decode::{decode_image, open_image};
use crate::encode::encode_png;
use crate::error::EditError;
use crate::history::{HistoryEntry, Timeline};
use crate::mask::{self, SelectionMask};
use crate::raster::RasterImage;
use crate::transform::{
    apply_rotation, crop_in_view, rotated_extent, zoom_view, CropInsets, DisplaySize,
    InterpolationFilter, ViewRect,
};

#[derive(Debug, Clone)]
pub struct Document {
    baseline: Arc<RasterImage>,
    working: Arc<RasterImage>,
    view: ViewRect,
    /// View corresponding to `baseline`.
    anchor: ViewRect,
    display: DisplaySize,
    timeline: Timeline,
}

impl Document {
    /// Start a document from a decoded image, displayed at its pixel size.
    pub fn new(image: RasterImage, display: DisplaySize) -> Self {
        let view = ViewRect::centered(image.width as f64, image.height as f64, display);
        let image = Arc::new(image);
        let timeline = Timeline::new(HistoryEntry::new(image.clone(), view.width, view.height));
        Self {
            baseline: image.clone(),
            working: image,
            view,
            anchor: view,
            display,
            timeline,
        }
    }

    /// Decode encoded image bytes into a new document.
    pub fn from_bytes(bytes: &[u8], display: DisplaySize) -> Result<Self, EditError> {
        Ok(Self::new(decode_image(bytes)?, display))
    }

    /// Read and decode an image file into a new document.
    pub fn open(path: impl AsRef<Path>, display: DisplaySize) -> Result<Self, EditError> {
        Ok(Self::new(open_image(path)?, display))
    }

    pub fn baseline(&self) -> &RasterImage {
        &self.baseline
    }

    pub fn working(&self) -> &RasterImage {
        &self.working
    }

    pub fn view(&self) -> ViewRect {
        self.view
    }

    pub fn display(&self) -> DisplaySize {
        self.display
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn is_original(&self) -> bool {
        self.timeline.is_original()
    }

    pub fn is_latest(&self) -> bool {
        self.timeline.is_latest()
    }

    /// True when `working` or the view differ from the last commit.
    pub fn has_pending_changes(&self) -> bool {
        !Arc::ptr_eq(&self.working, &self.baseline) || self.view != self.anchor
    }

    /// Re-center views after the display area changed size.
    pub fn set_display(&mut self, display: DisplaySize) {
        self.display = display;
        self.view = self.view.recentered(display);
        self.anchor = self.anchor.recentered(display);
    }

    // ------------------------------------------------------------------
    // Replaying operations
    // ------------------------------------------------------------------

    /// Apply an enhancement to the baseline.
    pub fn adjust(&mut self, kind: Enhancement, factor: f32) -> Result<(), EditError> {
        let result = enhance(&self.baseline, kind, factor)?;
        self.set_working(result, self.anchor);
        Ok(())
    }

    /// Crop the baseline by insets measured against its view.
    pub fn crop(&mut self, insets: CropInsets) -> Result<(), EditError> {
        if insets.is_zero() {
            self.revert();
            return Ok(());
        }
        let (result, (w, h)) = crop_in_view(&self.baseline, &self.anchor, insets)?;
        self.set_working(result, ViewRect::centered(w, h, self.display));
        Ok(())
    }

    /// Rotate the baseline counter-clockwise by `angle` degrees.
    ///
    /// With `update_dims` the canvas and view grow to the rotated bounds;
    /// otherwise both keep their size.
    pub fn rotate(
        &mut self,
        angle: f64,
        update_dims: bool,
        filter: InterpolationFilter,
    ) -> Result<(), EditError> {
        if !angle.is_finite() {
            return Err(EditError::invalid(
                "angle",
                format!("rotation angle must be finite, got {}", angle),
            ));
        }

        let result = apply_rotation(&self.baseline, angle, update_dims, filter);
        let view = if update_dims {
            let (w, h) = rotated_extent(self.anchor.width, self.anchor.height, angle);
            ViewRect::centered(w, h, self.display)
        } else {
            self.anchor
        };
        self.set_working(result, view);
        Ok(())
    }

    /// Pixelate the baseline. `factor == 0` restores it.
    pub fn pixelate(&mut self, factor: f64) -> Result<(), EditError> {
        let result = composite::pixelate(&self.baseline, factor)?;
        self.set_working(result, self.anchor);
        Ok(())
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    /// Rescale the view. Pixel data is untouched.
    pub fn zoom(&mut self, delta_w: f64, delta_h: f64) -> Result<(), EditError> {
        let (view, factor) = zoom_view(self.view, delta_w, delta_h, self.display)?;
        log::trace!("Zoom by {:.3} to {}x{}", factor, view.width, view.height);
        self.view = view;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Flood-select from a view-space point on the working image.
    pub fn select(&self, x: f64, y: f64, threshold: f64) -> Result<SelectionMask, EditError> {
        let (px, py) = self.to_working_pixel(x, y)?;
        mask::flood_select(&self.working, px, py, threshold)
    }

    /// Select every pixel similar to the one under a view-space point.
    pub fn select_similar(&self, x: f64, y: f64, threshold: f64) -> Result<SelectionMask, EditError> {
        let (px, py) = self.to_working_pixel(x, y)?;
        mask::select_similar(&self.working, px, py, threshold)
    }

    /// Erase the selected pixels to transparent white.
    pub fn apply_transparency(&mut self, selection: &SelectionMask) -> Result<(), EditError> {
        let result = mask::make_transparent(&self.working, selection)?;
        self.set_working(result, self.view);
        Ok(())
    }

    /// Paint the selected pixels opaque red.
    pub fn highlight(&mut self, selection: &SelectionMask) -> Result<(), EditError> {
        let result = mask::highlight(&self.working, selection)?;
        self.set_working(result, self.view);
        Ok(())
    }

    /// Flood-select and erase in one step.
    pub fn select_and_mask(&mut self, x: f64, y: f64, threshold: f64) -> Result<(), EditError> {
        let selection = self.select(x, y, threshold)?;
        log::debug!("Masking {} selected pixels", selection.count());
        self.apply_transparency(&selection)
    }

    // ------------------------------------------------------------------
    // Compositing
    // ------------------------------------------------------------------

    /// Composite `sticker` centered on a view-space point.
    pub fn paste_sticker(&mut self, sticker: &RasterImage, x: f64, y: f64) -> Result<(), EditError> {
        let (px, py) = self.to_working_pixel(x, y)?;
        let result = composite::paste_sticker(&self.working, sticker, px, py)?;
        self.set_working(result, self.view);
        Ok(())
    }

    pub fn invert(&mut self) {
        let result = composite::invert(&self.working);
        self.set_working(result, self.view);
    }

    pub fn grayscale(&mut self) {
        let result = composite::grayscale(&self.working);
        self.set_working(result, self.view);
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Record `working` and the view as a new history state.
    pub fn commit(&mut self) {
        let entry = self
            .timeline
            .commit(self.working.clone(), self.view.width, self.view.height);
        let image = entry.image().clone();
        log::debug!(
            "Committed {}x{} image, history position {} of {}",
            image.width,
            image.height,
            self.timeline.cursor() + 1,
            self.timeline.len()
        );
        self.baseline = image;
        self.anchor = self.view;
    }

    /// Step back one committed state, discarding any pending edit.
    pub fn undo(&mut self) -> Result<(), EditError> {
        let entry = self.timeline.undo()?.clone();
        self.restore(entry);
        log::debug!("Undo to history position {}", self.timeline.cursor());
        Ok(())
    }

    /// Step forward one committed state, discarding any pending edit.
    pub fn redo(&mut self) -> Result<(), EditError> {
        let entry = self.timeline.redo()?.clone();
        self.restore(entry);
        log::debug!("Redo to history position {}", self.timeline.cursor());
        Ok(())
    }

    /// Drop the pending edit.
    pub fn revert(&mut self) {
        self.working = self.baseline.clone();
        self.view = self.anchor;
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// The working image as PNG bytes, for display.
    pub fn encoded_working(&self) -> Result<Vec<u8>, EditError> {
        Ok(encode_png(&self.working)?)
    }

    /// Write the committed image next to `source` as `<stem>_<suffix>.png`.
    pub fn save(&self, source: &Path, suffix: &str) -> Result<PathBuf, EditError> {
        let target = saved_path(source, suffix);
        let bytes = encode_png(&self.baseline)?;
        std::fs::write(&target, bytes)
            .map_err(|e| EditError::Io(format!("{}: {}", target.display(), e)))?;
        log::info!("Saved {}", target.display());
        Ok(target)
    }

    fn set_working(&mut self, image: RasterImage, view: ViewRect) {
        self.working = Arc::new(image);
        self.view = view;
    }

    fn restore(&mut self, entry: HistoryEntry) {
        let (w, h) = entry.view_size();
        self.baseline = entry.image().clone();
        self.working = entry.image().clone();
        self.view = ViewRect::centered(w, h, self.display);
        self.anchor = self.view;
    }

    fn to_working_pixel(&self, x: f64, y: f64) -> Result<(u32, u32), EditError> {
        self.view.to_pixel(x, y, self.working.width, self.working.height)
    }
}

/// Output path for a saved edit: `<dir>/<stem>_<suffix>.png`.
pub fn saved_path(source: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    source.with_file_name(format!("{}_{}.png", stem, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryError;

    const DISPLAY: DisplaySize = DisplaySize {
        width: 800.0,
        height: 600.0,
    };
    const RED: [u8; 4] = [255, 0, 0, 255];

    fn gradient(width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x * 10) as u8, (y * 10) as u8, 128, 255]);
            }
        }
        RasterImage::new(width, height, pixels)
    }

    fn doc(width: u32, height: u32) -> Document {
        Document::new(gradient(width, height), DISPLAY)
    }

    #[test]
    fn test_new_document_state() {
        let d = doc(20, 10);
        assert!(d.is_original());
        assert!(d.is_latest());
        assert!(!d.has_pending_changes());
        assert_eq!(d.view(), ViewRect::centered(20.0, 10.0, DISPLAY));
        assert_eq!(d.working(), d.baseline());
    }

    #[test]
    fn test_adjust_is_non_cumulative() {
        let mut d = doc(8, 8);
        d.adjust(Enhancement::Brightness, 1.5).unwrap();
        let first = d.working().clone();
        d.adjust(Enhancement::Brightness, 0.2).unwrap();
        d.adjust(Enhancement::Brightness, 1.5).unwrap();
        assert_eq!(d.working(), &first);
        assert!(d.has_pending_changes());
    }

    #[test]
    fn test_adjust_negative_factor_leaves_working() {
        let mut d = doc(4, 4);
        d.adjust(Enhancement::Contrast, 1.3).unwrap();
        let before = d.working().clone();
        let result = d.adjust(Enhancement::Contrast, -1.0);
        assert!(matches!(result, Err(EditError::InvalidParameter { .. })));
        assert_eq!(d.working(), &before);
    }

    #[test]
    fn test_crop_zero_is_noop() {
        let mut d = doc(10, 10);
        d.crop(CropInsets::default()).unwrap();
        assert_eq!(d.working(), d.baseline());
        assert_eq!(d.view(), ViewRect::centered(10.0, 10.0, DISPLAY));
        assert!(!d.has_pending_changes());
    }

    #[test]
    fn test_crop_replays_from_baseline() {
        let mut d = doc(20, 20);
        d.crop(CropInsets::new(5.0, 0.0, 0.0, 0.0)).unwrap();
        d.crop(CropInsets::new(2.0, 0.0, 0.0, 0.0)).unwrap();
        assert_eq!(d.working().width, 18);
        assert_eq!(d.view().size(), (18.0, 20.0));
    }

    #[test]
    fn test_crop_after_zoom_commit_scales_insets() {
        let mut d = doc(20, 20);
        d.zoom(20.0, 20.0).unwrap();
        d.commit();
        assert_eq!(d.view().size(), (40.0, 40.0));

        d.crop(CropInsets::new(10.0, 0.0, 0.0, 0.0)).unwrap();
        assert_eq!((d.working().width, d.working().height), (15, 20));
        assert_eq!(d.view().size(), (30.0, 40.0));
    }

    #[test]
    fn test_rotate_swaps_view() {
        let mut d = doc(30, 10);
        d.rotate(90.0, true, InterpolationFilter::Nearest).unwrap();
        assert_eq!((d.working().width, d.working().height), (10, 30));
        assert_eq!(d.view().size(), (10.0, 30.0));
    }

    #[test]
    fn test_four_committed_quarter_turns_restore_view() {
        let mut d = Document::new(gradient(31, 10), DisplaySize::new(101.0, 77.0));
        let start = d.view();
        for _ in 0..4 {
            d.rotate(90.0, true, InterpolationFilter::Nearest).unwrap();
            d.commit();
        }
        assert_eq!(d.view(), start);
        assert_eq!(d.view(), ViewRect { x: 35.0, y: 33.0, width: 31.0, height: 10.0 });
        assert_eq!(d.working(), &gradient(31, 10));
    }

    #[test]
    fn test_rotate_without_update_keeps_geometry() {
        let mut d = doc(30, 10);
        d.rotate(30.0, false, InterpolationFilter::Nearest).unwrap();
        assert_eq!((d.working().width, d.working().height), (30, 10));
        assert_eq!(d.view().size(), (30.0, 10.0));
    }

    #[test]
    fn test_rotate_rejects_nan() {
        let mut d = doc(4, 4);
        assert!(d.rotate(f64::NAN, true, InterpolationFilter::Nearest).is_err());
        assert!(!d.has_pending_changes());
    }

    #[test]
    fn test_zoom_only_changes_view() {
        let mut d = doc(10, 10);
        d.zoom(10.0, 10.0).unwrap();
        assert_eq!(d.view().size(), (20.0, 20.0));
        assert_eq!(d.working(), d.baseline());
        assert!(d.has_pending_changes());
        d.revert();
        assert_eq!(d.view().size(), (10.0, 10.0));
    }

    #[test]
    fn test_select_and_mask() {
        let mut d = Document::new(RasterImage::filled(4, 4, RED), DISPLAY);
        d.select_and_mask(1.0, 1.0, 1.0).unwrap();
        assert!(d
            .working()
            .pixels
            .chunks_exact(4)
            .all(|px| px == mask::apply::ERASED));
    }

    #[test]
    fn test_select_uses_zoomed_view() {
        let mut d = doc(10, 10);
        d.zoom(10.0, 10.0).unwrap();
        // (19, 19) in a 20x20 view lands on pixel (9, 9)
        let sel = d.select(19.0, 19.0, 1.0).unwrap();
        assert!(sel.is_selected(9, 9));
        assert!(matches!(
            d.select(20.0, 0.0, 1.0),
            Err(EditError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_select_similar_on_document() {
        let d = Document::new(RasterImage::filled(3, 3, RED), DISPLAY);
        assert_eq!(d.select_similar(0.0, 0.0, 1.0).unwrap().count(), 9);
    }

    #[test]
    fn test_highlight_marks_selection() {
        let mut d = doc(4, 4);
        let sel = d.select(0.0, 0.0, 1.0).unwrap();
        d.highlight(&sel).unwrap();
        assert_eq!(d.working().pixel(0, 0), Some(mask::apply::HIGHLIGHT));
        assert_eq!(d.working().pixel(1, 0), d.baseline().pixel(1, 0));
    }

    #[test]
    fn test_accumulating_operations_stack() {
        let mut d = doc(4, 4);
        d.invert();
        d.invert();
        assert_eq!(d.working(), d.baseline());
        d.grayscale();
        assert!(d.working().pixels.chunks_exact(4).all(|px| px[0] == px[1] && px[1] == px[2]));
    }

    #[test]
    fn test_sticker_invalid_placement_leaves_working() {
        let mut d = doc(10, 10);
        let sticker = RasterImage::filled(6, 6, RED);
        let before = d.working().clone();
        let result = d.paste_sticker(&sticker, 1.0, 1.0);
        assert!(matches!(result, Err(EditError::InvalidPlacement { .. })));
        assert_eq!(d.working(), &before);
    }

    #[test]
    fn test_sticker_paste() {
        let mut d = doc(10, 10);
        let sticker = RasterImage::filled(2, 2, RED);
        d.paste_sticker(&sticker, 5.0, 5.0).unwrap();
        assert_eq!(d.working().pixel(4, 4), Some(RED));
        assert_eq!(d.working().pixel(5, 5), Some(RED));
        assert_eq!(d.working().pixel(6, 6), d.baseline().pixel(6, 6));
    }

    #[test]
    fn test_pixelate_zero_restores_baseline() {
        let mut d = doc(12, 12);
        d.pixelate(0.7).unwrap();
        assert_ne!(d.working(), d.baseline());
        d.pixelate(0.0).unwrap();
        assert_eq!(d.working(), d.baseline());
    }

    #[test]
    fn test_commit_undo_redo() {
        let mut d = doc(10, 10);
        d.crop(CropInsets::new(2.0, 2.0, 2.0, 2.0)).unwrap();
        d.commit();
        assert!(!d.is_original());
        assert_eq!(d.baseline().width, 6);
        assert!(!d.has_pending_changes());

        d.undo().unwrap();
        assert!(d.is_original());
        assert_eq!(d.working().width, 10);
        assert_eq!(d.view().size(), (10.0, 10.0));

        d.redo().unwrap();
        assert!(d.is_latest());
        assert_eq!(d.working().width, 6);
        assert_eq!(d.view(), ViewRect::centered(6.0, 6.0, DISPLAY));
    }

    #[test]
    fn test_undo_at_origin_is_boundary() {
        let mut d = doc(4, 4);
        let err = d.undo().unwrap_err();
        assert!(err.is_history_boundary());
        assert!(matches!(err, EditError::History(HistoryError::NoEarlierState)));
    }

    #[test]
    fn test_undo_discards_pending_edit() {
        let mut d = doc(4, 4);
        d.invert();
        d.commit();
        d.grayscale();
        d.undo().unwrap();
        assert!(!d.has_pending_changes());
        assert_eq!(d.working(), &gradient(4, 4));
    }

    #[test]
    fn test_commit_after_undo_truncates() {
        let mut d = doc(4, 4);
        d.invert();
        d.commit();
        d.grayscale();
        d.commit();
        d.undo().unwrap();
        d.undo().unwrap();
        d.adjust(Enhancement::Brightness, 0.5).unwrap();
        d.commit();
        assert_eq!(d.timeline().len(), 2);
        assert!(d.redo().unwrap_err().is_history_boundary());
    }

    #[test]
    fn test_set_display_recenters() {
        let mut d = doc(100, 50);
        d.set_display(DisplaySize::new(200.0, 100.0));
        assert_eq!(d.view(), ViewRect { x: 50.0, y: 25.0, width: 100.0, height: 50.0 });
        assert!(!d.has_pending_changes());
    }

    #[test]
    fn test_saved_path() {
        assert_eq!(
            saved_path(Path::new("/photos/cat.jpg"), "fotofix"),
            PathBuf::from("/photos/cat_fotofix.png")
        );
        assert_eq!(
            saved_path(Path::new("dog.png"), "v2"),
            PathBuf::from("dog_v2.png")
        );
    }

    #[test]
    fn test_save_writes_baseline_png() {
        let dir = std::env::temp_dir().join(format!("fotofix-save-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let source = dir.join("source.jpg");

        let mut d = doc(3, 2);
        d.invert();
        let saved = d.save(&source, "fotofix").unwrap();
        assert_eq!(saved, dir.join("source_fotofix.png"));

        // The pending invert is not part of the saved file
        let reloaded = open_image(&saved).unwrap();
        assert_eq!(&reloaded, d.baseline());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(matches!(
            Document::from_bytes(b"not an image", DISPLAY),
            Err(EditError::Decode(_))
        ));
    }

    #[test]
    fn test_encoded_working_round_trips() {
        let d = doc(5, 3);
        let png = d.encoded_working().unwrap();
        let decoded = decode_image(&png).unwrap();
        assert_eq!(&decoded, d.working());
    }
}
