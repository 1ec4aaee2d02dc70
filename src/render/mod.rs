//! Render collaborator seams.
//!
//! The viewport core never paints, lays out glyphs or hit-tests text itself. It
//! drives the traits in this module:
//!
//! - [`LineFactory`] creates one [`LineRender`] handle per materialized line
//! - [`LineRender`] is the opaque per-line handle (text, layout state, geometry)
//! - [`LineMeasurer`] measures lines off-screen and snaps heights to pixels
//! - [`PaneListener`] receives per-line UI events, forwarded through [`LineEvents`]
//! - [`DocumentPositions`] converts document offsets to lines
//!
//! [`monospace`] provides a reference implementation of all of them.

pub mod monospace;

use crate::model::{BackgroundSpan, MeasureError, Point, Rect, StyleKey, StyledSegment};
use std::fmt;
use std::rc::Rc;

/// Opaque render handle for one visible document line.
///
/// Geometry is only trustworthy once the host has run a layout pass on the
/// handle; until then [`needs_layout`](LineRender::needs_layout) reports `true`.
pub trait LineRender {
    /// Replace the line's content.
    fn set_text(&mut self, segments: &[StyledSegment], x_translate: f64, wrap: bool, style: &StyleKey);

    /// Whether a layout pass is pending.
    fn needs_layout(&self) -> bool;

    /// Whether the handle's applied font already reflects `style`.
    ///
    /// Hosts that apply styles asynchronously may report `false` for a while
    /// after a style change even though layout is not pending.
    fn uses_style(&self, _style: &StyleKey) -> bool {
        true
    }

    /// Bounds of the caret at `column`, in the handle's text coordinates.
    fn caret_bounds(&self, column: usize) -> Option<Rect>;

    /// Bounds covering the columns `start..end`, in the handle's text coordinates.
    fn range_bounds(&self, start: usize, end: usize) -> Option<Rect>;

    /// Insertion index nearest to `point`, given in text coordinates.
    fn hit_test(&self, point: Point) -> Option<usize>;

    /// Position and size of the whole line (margin included) within the pane.
    fn layout_bounds(&self) -> Rect;

    /// Height of a single row of text under the applied style.
    fn single_text_height(&self) -> f64;

    /// Re-apply the style after a font size change.
    fn font_size_changed(&mut self, style: &StyleKey);

    /// Replace the scope background spans; `None` clears them.
    fn set_scope_backgrounds(&mut self, spans: Option<&[BackgroundSpan]>);

    /// Hide any error underline currently shown on the line.
    fn hide_error_underline(&mut self);

    /// Toggle a named visual state (e.g. "bj-line-wrapping") on the line.
    fn set_pseudoclass(&mut self, name: &str, on: bool);
}

/// Creates render handles for lines entering the visible window.
pub trait LineFactory {
    /// Handle type produced.
    type Line: LineRender;

    /// Create the handle for `index`; `events` is bound to that line.
    fn create(&mut self, index: usize, wrap: bool, events: LineEvents) -> Self::Line;
}

/// Off-screen measurement of line content.
pub trait LineMeasurer {
    /// Natural width of a single unwrapped line of plain text.
    fn measure_width(&self, text: &str, style: &StyleKey) -> Result<f64, MeasureError>;

    /// Height of the given content when wrapped at `max_width`, or unwrapped when `None`.
    fn measure_height(&self, content: &[StyledSegment], max_width: Option<f64>, style: &StyleKey) -> f64;

    /// Snap a height to the device pixel grid.
    fn snap_height(&self, height: f64) -> f64 {
        height
    }
}

/// Direction-agnostic scroll event delivered on a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    /// Horizontal delta in pixels.
    pub delta_x: f64,
    /// Vertical delta in pixels; negative moves down the document.
    pub delta_y: f64,
}

/// Receiver of UI events raised on visible lines.
///
/// The core forwards these without interpretation.
pub trait PaneListener {
    /// The margin of `line` was clicked.
    fn margin_clicked_for_line(&self, line: usize);

    /// A context menu was requested at `screen_point`.
    fn context_menu_requested(&self, screen_point: Point);

    /// A scroll gesture landed on a line.
    fn scroll_event_on_line(&self, event: ScrollEvent);
}

/// Listener that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPaneListener;

impl PaneListener for NoopPaneListener {
    fn margin_clicked_for_line(&self, _line: usize) {}
    fn context_menu_requested(&self, _screen_point: Point) {}
    fn scroll_event_on_line(&self, _event: ScrollEvent) {}
}

/// Event sink bound to one line, handed to each created handle.
#[derive(Clone)]
pub struct LineEvents {
    line: usize,
    listener: Rc<dyn PaneListener>,
}

impl LineEvents {
    /// Bind `listener` to `line`.
    pub fn new(line: usize, listener: Rc<dyn PaneListener>) -> Self {
        Self { line, listener }
    }

    /// Document line the sink is bound to.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Report a click in this line's margin.
    pub fn margin_clicked(&self) {
        self.listener.margin_clicked_for_line(self.line);
    }

    /// Report a context menu request at a screen point.
    pub fn context_menu(&self, screen_point: Point) {
        self.listener.context_menu_requested(screen_point);
    }

    /// Report a scroll gesture on this line.
    pub fn scrolled(&self, event: ScrollEvent) {
        self.listener.scroll_event_on_line(event);
    }
}

impl fmt::Debug for LineEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineEvents").field("line", &self.line).finish_non_exhaustive()
    }
}

/// Offset ↔ line conversion supplied by the document model.
pub trait DocumentPositions {
    /// Line containing `offset`.
    fn line_from_position(&self, offset: usize) -> usize;
    /// Offset of the first character of `line`.
    fn line_start(&self, line: usize) -> usize;
    /// Offset just past the last character of `line`, terminator excluded.
    fn line_end(&self, line: usize) -> usize;
}
