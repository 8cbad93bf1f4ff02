//! Linear undo/redo history.
//!
//! The timeline is a cursor into an append-only list of committed states.
//! Committing while the cursor is behind the tail drops everything after the
//! cursor first, so an undo followed by a new edit permanently discards the
//! redo branch. There is no version tree.

use std::sync::Arc;

use thiserror::Error;

use crate::raster::RasterImage;

/// Errors returned at the ends of the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// The cursor is already on the original image.
    #[error("No earlier state to undo to")]
    NoEarlierState,

    /// The cursor is already on the most recent commit.
    #[error("No later state to redo to")]
    NoLaterState,
}

/// A committed image together with the view size it was displayed at.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    image: Arc<RasterImage>,
    view_width: f64,
    view_height: f64,
}

impl HistoryEntry {
    pub fn new(image: Arc<RasterImage>, view_width: f64, view_height: f64) -> Self {
        Self {
            image,
            view_width,
            view_height,
        }
    }

    pub fn image(&self) -> &Arc<RasterImage> {
        &self.image
    }

    pub fn view_size(&self) -> (f64, f64) {
        (self.view_width, self.view_height)
    }
}

/// Ordered committed states plus the undo/redo cursor.
///
/// Invariant: `cursor < entries.len()`, and `entries[0]` is the original image.
#[derive(Debug, Clone)]
pub struct Timeline {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl Timeline {
    /// Start a history seeded with the original image.
    pub fn new(original: HistoryEntry) -> Self {
        Self {
            entries: vec![original],
            cursor: 0,
        }
    }

    /// Append a new state, discarding any redo-able entries first.
    pub fn commit(&mut self, image: Arc<RasterImage>, view_width: f64, view_height: f64) -> &HistoryEntry {
        let discarded = self.entries.len() - (self.cursor + 1);
        if discarded > 0 {
            log::debug!("Commit discards {} redo entries", discarded);
            self.entries.truncate(self.cursor + 1);
        }

        self.entries.push(HistoryEntry::new(image, view_width, view_height));
        self.cursor = self.entries.len() - 1;
        &self.entries[self.cursor]
    }

    /// Step back one state.
    pub fn undo(&mut self) -> Result<&HistoryEntry, HistoryError> {
        if self.cursor == 0 {
            return Err(HistoryError::NoEarlierState);
        }
        self.cursor -= 1;
        Ok(&self.entries[self.cursor])
    }

    /// Step forward one state.
    pub fn redo(&mut self) -> Result<&HistoryEntry, HistoryError> {
        if self.cursor + 1 >= self.entries.len() {
            return Err(HistoryError::NoLaterState);
        }
        self.cursor += 1;
        Ok(&self.entries[self.cursor])
    }

    /// The entry under the cursor.
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true while the original entry exists; commits only truncate
    /// entries after the cursor.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the cursor sits on the original image.
    pub fn is_original(&self) -> bool {
        self.cursor == 0
    }

    /// True when the cursor sits on the most recent commit.
    pub fn is_latest(&self) -> bool {
        self.cursor == self.entries.len() - 1
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
