//! Viewport anchor into the document.

use serde::Serialize;

/// Anchor of the visible window.
///
/// # Invariants
/// - `first_visible_line_offset` lies in `(-line_height_estimate, 0]` after any
///   clamping scroll operation; a positive offset would leave a gap above the
///   first line.
/// - `line_height_estimate > 0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportState {
    /// Document index of the topmost (possibly partially) visible line.
    pub first_visible_line_index: usize,
    /// Pixel offset of that line's top edge; zero or negative.
    pub first_visible_line_offset: f64,
    /// Line height last used for fixed-height layout; drives scroll arithmetic.
    pub line_height_estimate: f64,
}

impl ViewportState {
    /// Anchor at the top of the document.
    pub fn new() -> Self {
        Self {
            first_visible_line_index: 0,
            first_visible_line_offset: 0.0,
            line_height_estimate: 1.0,
        }
    }

    /// Anchor at an explicit position.
    pub fn at(line: usize, offset: f64, line_height_estimate: f64) -> Self {
        Self {
            first_visible_line_index: line,
            first_visible_line_offset: offset,
            line_height_estimate,
        }
    }

    /// Scroll depth in pixels: how far the top of the viewport is below the
    /// top of the document at the estimated line height.
    pub fn overall_position(&self) -> f64 {
        self.first_visible_line_index as f64 * self.line_height_estimate - self.first_visible_line_offset
    }

    /// Pull the anchor back onto the last line when the document no longer
    /// reaches it. Returns whether the anchor moved.
    pub fn clamp_to_document(&mut self, line_count: usize) -> bool {
        if self.first_visible_line_index >= line_count {
            self.first_visible_line_index = line_count.saturating_sub(1);
            self.first_visible_line_offset = 0.0;
            true
        } else {
            false
        }
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new()
    }
}
