//! Line display: the recalculation engine and every query over the visible window.

use super::{
    listener::{LineDisplayListener, ListenerRegistry},
    measure::{MeasurementCache, DEFAULT_WIDTH_CACHE_CAPACITY},
    viewport::ViewportState,
    visible_lines::VisibleLineStore,
    visible_range::VisibleRange,
};
use crate::model::{BackgroundSpan, Point, Rect, StyleKey, StyledSegment, ViewportError};
use crate::render::{
    DocumentPositions, LineEvents, LineFactory, LineMeasurer, LineRender, NoopPaneListener, PaneListener,
};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Static options of a display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayOptions {
    /// Whether lines reserve room for the left margin.
    pub show_left_margin: bool,
    /// Width of the left margin in pixels.
    pub margin_width: f64,
    /// Bound on cached line widths.
    pub width_cache_capacity: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_left_margin: true,
            margin_width: 24.0,
            width_cache_capacity: DEFAULT_WIDTH_CACHE_CAPACITY,
        }
    }
}

/// The set of visible lines of an editor pane.
///
/// Visible lines are always a contiguous block of document lines starting at
/// the viewport anchor. Render handles are created lazily by the factory,
/// reused while their line stays in the window and dropped when it leaves.
///
/// # Layout Modes
/// Without wrapping every line is assumed to be one representative line tall
/// and the number of handles follows from the container height. With wrapping
/// each line is measured individually at the container width until the
/// container is filled.
///
/// # Style
/// The active style is pulled from the style source at the start of every
/// operation that depends on it.
pub struct LineDisplay<F: LineFactory, M: LineMeasurer> {
    viewport: ViewportState,
    visible: VisibleLineStore<F::Line>,
    cache: MeasurementCache,
    listeners: ListenerRegistry,
    factory: F,
    measurer: M,
    style: Box<dyn Fn() -> StyleKey>,
    horiz_scroll: Box<dyn Fn() -> f64>,
    pane_listener: Rc<dyn PaneListener>,
    options: DisplayOptions,
}

impl<F: LineFactory, M: LineMeasurer> LineDisplay<F, M> {
    /// Create a display with the default style, no horizontal scroll and a
    /// pane listener that ignores events.
    pub fn new(factory: F, measurer: M, options: DisplayOptions) -> Self {
        Self {
            viewport: ViewportState::new(),
            visible: VisibleLineStore::new(),
            cache: MeasurementCache::new(options.width_cache_capacity),
            listeners: ListenerRegistry::new(),
            factory,
            measurer,
            style: Box::new(StyleKey::default),
            horiz_scroll: Box::new(|| 0.0),
            pane_listener: Rc::new(NoopPaneListener),
            options,
        }
    }

    /// Sample the active style from `source`.
    pub fn with_style_source(mut self, source: impl Fn() -> StyleKey + 'static) -> Self {
        self.style = Box::new(source);
        self
    }

    /// Use a fixed style.
    pub fn with_style(self, style: StyleKey) -> Self {
        self.with_style_source(move || style.clone())
    }

    /// Sample the horizontal scroll offset from `source`.
    pub fn with_horizontal_scroll(mut self, source: impl Fn() -> f64 + 'static) -> Self {
        self.horiz_scroll = Box::new(source);
        self
    }

    /// Forward per-line UI events to `listener`.
    pub fn with_pane_listener(mut self, listener: Rc<dyn PaneListener>) -> Self {
        self.pane_listener = listener;
        self
    }

    // === Recalculation ===

    /// Recalculate the visible lines for a container of `width` x `height`
    /// pixels and return their handles in ascending line order.
    ///
    /// `all_lines` is the full document; `x_translate` is the horizontal
    /// translation handed to every line.
    pub fn recalculate<L: AsRef<[StyledSegment]>>(
        &mut self,
        all_lines: &[L],
        x_translate: f64,
        width: f64,
        height: f64,
        wrap: bool,
    ) -> Vec<&F::Line> {
        let line_count = all_lines.len();
        if self.viewport.clamp_to_document(line_count) {
            debug!(line_count, "Document shrank below anchor, showing last line");
        }

        let style = (self.style)();
        let first = self.viewport.first_visible_line_index;

        let end = if wrap {
            self.measured_end(all_lines, first, width, height, &style)
        } else {
            let line_height = self
                .measurer
                .snap_height(self.cache.line_height(&self.measurer, &style));
            if line_height > 0.0 {
                self.viewport.line_height_estimate = line_height;
            }
            first.saturating_add(self.lines_needed(line_height, height)).min(line_count)
        };

        let factory = &mut self.factory;
        let pane_listener = &self.pane_listener;
        let created = self.visible.retain_window(first, end, |index| {
            factory.create(index, wrap, LineEvents::new(index, pane_listener.clone()))
        });
        for (index, line) in self.visible.iter_mut() {
            line.set_text(all_lines[index].as_ref(), x_translate, wrap, &style);
        }

        let range = self.line_range_visible();
        debug!(
            first = range.start,
            end = range.end,
            created,
            wrap,
            line_height = self.viewport.line_height_estimate,
            "Recalculated visible lines"
        );
        if let Some((first, last)) = range.inclusive() {
            self.listeners.notify(first, last);
        }

        self.visible.iter().map(|(_, line)| line).collect()
    }

    /// Handles needed without wrapping: the partly hidden top line, the whole
    /// lines below it, and one more for the partly shown bottom line.
    ///
    /// When the container ends exactly on a line boundary the extra line is
    /// still materialized, so sub-pixel scrolling never exposes a blank strip.
    /// A container shorter than the top line's visible part needs only that
    /// line, or nothing when it has no height left at all.
    fn lines_needed(&self, line_height: f64, height: f64) -> usize {
        if line_height <= 0.0 {
            return 1;
        }
        let top_visible = line_height + self.viewport.first_visible_line_offset;
        let below = (height - top_visible) / line_height;
        let needed = if below >= 0.0 {
            2.0 + below.floor()
        } else {
            1.0 + below.ceil()
        };
        needed.max(0.0) as usize
    }

    /// One past the last line needed with wrapping, measuring each line at `width`.
    fn measured_end<L: AsRef<[StyledSegment]>>(
        &self,
        all_lines: &[L],
        first: usize,
        width: f64,
        height: f64,
        style: &StyleKey,
    ) -> usize {
        let mut total = 0.0;
        let mut end = first;
        while end < all_lines.len() && total < height {
            let measured = self.calculate_line_height_for(all_lines[end].as_ref(), Some(width), style);
            total += self.measurer.snap_height(measured);
            end += 1;
        }
        end
    }

    // === Visibility Queries ===
    //
    // The window is anchored on the viewport: `first..first + count`, where
    // `count` is the number of handles held. A scroll moves the window at once;
    // the handles catch up on the next recalculation.

    /// Whether `line` is inside the visible window.
    pub fn is_line_visible(&self, line: usize) -> bool {
        self.line_range_visible().contains(line)
    }

    /// Handle of a visible line.
    ///
    /// # Errors
    /// [`ViewportError::LineNotVisible`] when `line` is outside the window, or
    /// the window moved and its handle has not been created yet; check
    /// [`is_line_visible`](Self::is_line_visible) first.
    pub fn get_visible_line(&self, line: usize) -> Result<&F::Line, ViewportError> {
        self.is_line_visible(line)
            .then(|| self.visible.get(line))
            .flatten()
            .ok_or_else(|| self.not_visible(line))
    }

    /// Mutable handle of a visible line.
    ///
    /// # Errors
    /// [`ViewportError::LineNotVisible`] when `line` is outside the window.
    pub fn get_visible_line_mut(&mut self, line: usize) -> Result<&mut F::Line, ViewportError> {
        let err = self.not_visible(line);
        if !self.is_line_visible(line) {
            return Err(err);
        }
        self.visible.get_mut(line).ok_or(err)
    }

    fn not_visible(&self, requested: usize) -> ViewportError {
        let range = self.line_range_visible();
        ViewportError::LineNotVisible {
            requested,
            first: range.start,
            end: range.end,
        }
    }

    /// Number of visible lines.
    pub fn visible_line_count(&self) -> usize {
        self.visible.len()
    }

    /// Range of visible lines.
    pub fn line_range_visible(&self) -> VisibleRange {
        let first = self.viewport.first_visible_line_index;
        VisibleRange::new(first, first + self.visible.len())
    }

    /// Visible handles in ascending line order.
    pub fn visible_lines(&self) -> impl Iterator<Item = (usize, &F::Line)> {
        self.visible.iter()
    }

    /// Mutable visible handles, for the host's layout pass.
    pub fn visible_lines_mut(&mut self) -> impl Iterator<Item = (usize, &mut F::Line)> {
        self.visible.iter_mut()
    }

    // === Scrolling ===

    /// Current viewport anchor.
    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// Index of the topmost visible line.
    pub fn first_visible_line_index(&self) -> usize {
        self.viewport.first_visible_line_index
    }

    /// Pixel offset of the topmost visible line; zero or negative.
    pub fn first_visible_line_offset(&self) -> f64 {
        self.viewport.first_visible_line_offset
    }

    /// Line height used by the last fixed-height recalculation.
    pub fn line_height(&self) -> f64 {
        self.viewport.line_height_estimate
    }

    /// See [`ViewportState::scroll_to`].
    pub fn scroll_to(&mut self, line: usize, offset: f64) {
        self.viewport.scroll_to(line, offset);
    }

    /// See [`ViewportState::scroll_by`].
    pub fn scroll_by(&mut self, delta_y: f64, document_lines: usize, container_height: f64) {
        self.viewport.scroll_by(delta_y, document_lines, container_height);
    }

    /// Scroll minimally so `line` is fully shown; see
    /// [`ViewportState::ensure_line_visible`].
    pub fn ensure_line_visible(&mut self, line: usize, container_height: f64, lines_in_document: usize) {
        let visible_count = self.visible.len();
        self.viewport
            .ensure_line_visible(line, container_height, lines_in_document, visible_count);
    }

    // === Measurement ===

    /// Natural width of `text` under the active style.
    pub fn calculate_line_width(&mut self, text: &str) -> f64 {
        let style = (self.style)();
        self.cache.line_width(&self.measurer, &style, text)
    }

    /// Height of one representative line under the active style.
    pub fn calculate_line_height(&mut self) -> f64 {
        let style = (self.style)();
        self.cache.line_height(&self.measurer, &style)
    }

    /// Height of `content` wrapped at `max_width` under `style`.
    pub fn calculate_line_height_for(&self, content: &[StyledSegment], max_width: Option<f64>, style: &StyleKey) -> f64 {
        MeasurementCache::content_height(&self.measurer, content, max_width, style)
    }

    /// Measurement cache, for inspection.
    pub fn measurement_cache(&self) -> &MeasurementCache {
        &self.cache
    }

    /// Height of a single text row on the first visible line, or the line
    /// height estimate when nothing is visible.
    pub fn font_size_in_pixels(&self) -> f64 {
        self.visible
            .iter()
            .next()
            .map(|(_, line)| line.single_text_height())
            .unwrap_or(self.viewport.line_height_estimate)
    }

    /// X of the text's left edge within a line.
    pub fn text_left_edge(&self) -> f64 {
        if self.options.show_left_margin {
            self.options.margin_width
        } else {
            0.0
        }
    }

    // === Geometry ===

    /// X of the caret before `column` on `line`, in line coordinates.
    ///
    /// `None` when the position cannot be trusted yet: the line is not
    /// visible, still needs layout, or does not reflect the active style.
    pub fn calculate_left_edge_x(&self, line: usize, column: usize) -> Option<f64> {
        let handle = self.visible.get(line)?;
        if handle.needs_layout() || !handle.uses_style(&(self.style)()) {
            return None;
        }
        let bounds = handle.caret_bounds(column)?;
        // At the left edge for a later column: not laid out yet.
        if column > 0 && bounds.max_x() < 2.0 {
            return None;
        }
        Some((bounds.min_x() + bounds.max_x()) / 2.0)
    }

    /// Pane rectangles covering the document offsets `start..end`, one per
    /// visible line the range touches.
    pub fn bounds_for_range(&self, document: &impl DocumentPositions, start: usize, end: usize) -> Vec<Rect> {
        let first_line = document.line_from_position(start);
        let last_line = document.line_from_position(end);
        let dx = self.text_left_edge() - (self.horiz_scroll)();

        (first_line..=last_line)
            .filter_map(|line| {
                let handle = self.visible.get(line)?;
                let line_start = document.line_start(line);
                let from = start.max(line_start) - line_start;
                let to = end.min(document.line_end(line)).saturating_sub(line_start);
                let layout = handle.layout_bounds();
                handle
                    .range_bounds(from, to)
                    .map(|rect| rect.translate(layout.x + dx, layout.y))
            })
            .collect()
    }

    /// `(line, column)` under a point in pane coordinates, if any.
    pub fn caret_position_for_local_point(&self, point: Point) -> Option<(usize, usize)> {
        let horiz_scroll = (self.horiz_scroll)();
        self.visible.iter().find_map(|(index, line)| {
            let layout = line.layout_bounds();
            if !layout.spans_y(point.y) {
                return None;
            }
            let local = Point::new(
                point.x - layout.x - self.text_left_edge() + horiz_scroll,
                point.y - layout.y,
            );
            if local.x < 0.0 {
                return None;
            }
            line.hit_test(local).map(|column| (index, column))
        })
    }

    // === Bulk Styling ===

    /// Register a rendered-range observer.
    pub fn add_listener(&mut self, listener: impl LineDisplayListener + 'static) {
        self.listeners.add(listener);
    }

    /// Re-apply the active style to every visible line.
    pub fn font_size_changed(&mut self) {
        let style = (self.style)();
        for (_, line) in self.visible.iter_mut() {
            line.font_size_changed(&style);
        }
    }

    /// Apply precomputed scope backgrounds; visible lines missing from the
    /// map have theirs cleared.
    pub fn apply_scope_backgrounds(&mut self, backgrounds: &HashMap<usize, Vec<BackgroundSpan>>) {
        for (index, line) in self.visible.iter_mut() {
            line.set_scope_backgrounds(backgrounds.get(&index).map(Vec::as_slice));
        }
    }

    /// Hide error underlines on every visible line.
    pub fn hide_all_error_underlines(&mut self) {
        for (_, line) in self.visible.iter_mut() {
            line.hide_error_underline();
        }
    }

    /// Toggle a named visual state on every visible line.
    pub fn set_pseudoclass_on_all_visible_lines(&mut self, name: &str, on: bool) {
        for (_, line) in self.visible.iter_mut() {
            line.set_pseudoclass(name, on);
        }
    }

    /// Static options.
    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// Line factory.
    pub fn factory(&self) -> &F {
        &self.factory
    }
}

impl<F: LineFactory, M: LineMeasurer> std::fmt::Debug for LineDisplay<F, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineDisplay")
            .field("viewport", &self.viewport)
            .field("visible", &self.line_range_visible())
            .field("cache", &self.cache)
            .field("listeners", &self.listeners)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
