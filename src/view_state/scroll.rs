//! Scroll controller: translate scroll requests into viewport anchors.
//!
//! All operations act on [`ViewportState`] alone; they never touch render
//! handles. Pixel arithmetic uses `line_height_estimate`, so callers must have
//! recalculated at least once under the current style before trusting them.
//!
//! # Clamping Behavior
//! [`scroll_by`](ViewportState::scroll_by) clamps the scroll depth to
//! `[0, line_height * lines - container_height]`, upper bound first, so
//! documents shorter than the container resolve to the top.
//! [`ensure_line_visible`](ViewportState::ensure_line_visible) aligns the
//! target's bottom edge with the container's bottom edge when scrolling down.

use super::viewport::ViewportState;
use tracing::trace;

impl ViewportState {
    /// Set the anchor unconditionally.
    ///
    /// No validation: the caller is responsible for `offset` lying in
    /// `(-line_height, 0]`.
    pub fn scroll_to(&mut self, line: usize, offset: f64) {
        trace!(line, offset, "scroll_to");
        self.first_visible_line_index = line;
        self.first_visible_line_offset = offset;
    }

    /// Scroll by a pixel delta. Negative `delta_y` moves down the document.
    ///
    /// No-op when `delta_y` is zero.
    pub fn scroll_by(&mut self, delta_y: f64, document_lines: usize, container_height: f64) {
        if delta_y == 0.0 {
            return;
        }

        let line_height = self.line_height_estimate;
        let mut position = self.overall_position() - delta_y;
        // Upper bound first: for short documents it goes negative and the
        // lower bound then lands on zero.
        position = position.min(line_height * document_lines as f64 - container_height);
        position = position.max(0.0);

        let mut top = (position / line_height).floor().max(0.0) as usize;
        let mut offset = top as f64 * line_height - position;
        // Float rounding in the division can leave the offset a hair outside
        // (-line_height, 0].
        if offset <= -line_height {
            top += 1;
            offset += line_height;
        }
        self.scroll_to(top, offset.min(0.0));
    }

    /// Scroll minimally so `line` is fully inside a container `container_height`
    /// pixels tall.
    ///
    /// `visible_count` is the number of lines materialized by the last
    /// recalculation. A zero-height container is a deferred no-op: the caller
    /// retries once the container has a real size.
    ///
    /// The upward check runs first and the downward check runs regardless of it:
    /// after a large deletion the document may be shorter than the window, which
    /// only the downward branch corrects.
    pub fn ensure_line_visible(
        &mut self,
        line: usize,
        container_height: f64,
        lines_in_document: usize,
        visible_count: usize,
    ) {
        if container_height == 0.0 {
            trace!(line, "ensure_line_visible deferred: zero-height container");
            return;
        }

        // A boundary line may be only partially shown, so equality still scrolls.
        if line <= self.first_visible_line_index {
            self.scroll_to(line, 0.0);
        }

        let line_height = self.line_height_estimate;
        let first = self.first_visible_line_index as i64;
        let last_visible = first + visible_count as i64 - 1;
        let window_too_short = (visible_count as f64) * line_height < container_height && first > 0;

        if line as i64 >= last_visible || window_too_short {
            // e.g. 84px at 10px per line needs 9 lines, the top one partly hidden.
            let lines_can_display = (container_height / line_height).ceil() as i64;
            let last_screen_top = lines_in_document as i64 - lines_can_display + 1;

            let top = if line as i64 >= last_screen_top && first >= last_screen_top {
                last_screen_top
            } else {
                line as i64 - lines_can_display + 1
            };

            if top < 0 {
                self.scroll_to(0, 0.0);
            } else {
                // Pull the top line up so the target's bottom meets the container's bottom.
                let offset = container_height - lines_can_display as f64 * line_height;
                self.scroll_to(top as usize, offset);
            }
        }
    }
}
