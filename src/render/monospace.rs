//! Reference monospace collaborators.
//!
//! A headless implementation of the render seams where every character
//! occupies `unicode-width` cells of a fixed cell width. Used by the
//! `lineview` binary, the integration tests and the benchmarks.
//!
//! Metrics are derived from the style token: a `font-size: Npx` declaration
//! gives a line height of `N` pixels and a cell width of `0.6 * N`. Styles
//! without a font size fall back to 10px.
//!
//! Geometry is expressed in unscrolled text coordinates: the horizontal
//! translation passed to `set_text` only affects painting.

use super::{LineEvents, LineFactory, LineMeasurer, LineRender};
use crate::model::{line_text, BackgroundSpan, MeasureError, Point, Rect, StyleKey, StyledSegment};
use std::collections::BTreeSet;
use unicode_width::UnicodeWidthChar;

/// Font size used when the style does not declare one.
pub const DEFAULT_FONT_SIZE: f64 = 10.0;

/// Cell width as a fraction of the font size.
const CELL_WIDTH_RATIO: f64 = 0.6;

/// Cell and row metrics for one style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonoMetrics {
    /// Width of one terminal-style cell in pixels.
    pub cell_width: f64,
    /// Height of one row of text in pixels.
    pub line_height: f64,
}

impl MonoMetrics {
    /// Derive metrics from a style token.
    pub fn from_style(style: &StyleKey) -> Self {
        let size = parse_font_size(style.as_str()).unwrap_or(DEFAULT_FONT_SIZE);
        Self {
            cell_width: size * CELL_WIDTH_RATIO,
            line_height: size,
        }
    }

    /// Number of whole cells that fit in `width`, at least one.
    fn cells_per_row(&self, width: f64) -> usize {
        ((width / self.cell_width).floor() as usize).max(1)
    }
}

/// Extract `N` from a `font-size: Npx` declaration.
fn parse_font_size(style: &str) -> Option<f64> {
    let (_, rest) = style.split_once("font-size")?;
    let rest = rest.trim_start().strip_prefix(':')?.trim_start();
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    rest[..end].parse::<f64>().ok().filter(|size| *size > 0.0)
}

/// Display cells taken by `text`.
fn cell_count(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Off-screen measurer for monospace text.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonoMeasurer {
    /// Round measured heights up to whole pixels.
    pub snap_to_pixels: bool,
}

impl MonoMeasurer {
    /// Measurer that rounds heights up to whole pixels.
    pub fn snapping() -> Self {
        Self {
            snap_to_pixels: true,
        }
    }
}

impl LineMeasurer for MonoMeasurer {
    fn measure_width(&self, text: &str, style: &StyleKey) -> Result<f64, MeasureError> {
        if text.contains(['\n', '\r']) {
            return Err(MeasureError::Failed {
                style: style.to_string(),
                reason: "text spans more than one line".to_string(),
            });
        }
        let metrics = MonoMetrics::from_style(style);
        Ok(cell_count(text) as f64 * metrics.cell_width)
    }

    fn measure_height(&self, content: &[StyledSegment], max_width: Option<f64>, style: &StyleKey) -> f64 {
        let metrics = MonoMetrics::from_style(style);
        let rows = match max_width {
            Some(width) if width > 0.0 => {
                let cells = cell_count(&line_text(content));
                cells.div_ceil(metrics.cells_per_row(width)).max(1)
            }
            _ => 1,
        };
        rows as f64 * metrics.line_height
    }

    fn snap_height(&self, height: f64) -> f64 {
        if self.snap_to_pixels {
            height.ceil()
        } else {
            height
        }
    }
}

/// A headless monospace line handle.
#[derive(Debug)]
pub struct MonoLine {
    index: usize,
    wrap: bool,
    text: String,
    x_translate: f64,
    style: StyleKey,
    metrics: MonoMetrics,
    margin_width: f64,
    bounds: Rect,
    needs_layout: bool,
    backgrounds: Vec<BackgroundSpan>,
    error_underline: bool,
    pseudoclasses: BTreeSet<String>,
    events: LineEvents,
}

impl MonoLine {
    /// Create an empty handle for `index`.
    pub fn new(index: usize, wrap: bool, margin_width: f64, events: LineEvents) -> Self {
        let style = StyleKey::default();
        Self {
            index,
            wrap,
            text: String::new(),
            x_translate: 0.0,
            metrics: MonoMetrics::from_style(&style),
            style,
            margin_width,
            bounds: Rect::default(),
            needs_layout: true,
            backgrounds: Vec::new(),
            error_underline: false,
            pseudoclasses: BTreeSet::new(),
            events,
        }
    }

    /// Document line this handle was created for.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Plain text currently shown.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Horizontal translation applied when painting.
    pub fn x_translate(&self) -> f64 {
        self.x_translate
    }

    /// Style currently applied.
    pub fn style(&self) -> &StyleKey {
        &self.style
    }

    /// Scope backgrounds currently applied.
    pub fn backgrounds(&self) -> &[BackgroundSpan] {
        &self.backgrounds
    }

    /// Whether an error underline is shown.
    pub fn has_error_underline(&self) -> bool {
        self.error_underline
    }

    /// Show an error underline.
    pub fn show_error_underline(&mut self) {
        self.error_underline = true;
    }

    /// Whether the named pseudoclass is set.
    pub fn has_pseudoclass(&self, name: &str) -> bool {
        self.pseudoclasses.contains(name)
    }

    /// Event sink bound to this line.
    pub fn events(&self) -> &LineEvents {
        &self.events
    }

    /// Lay the line out at `(x, y)` with the given total width, margin included.
    pub fn layout(&mut self, x: f64, y: f64, width: f64) {
        let rows = self.row_count(width - self.margin_width);
        self.bounds = Rect::new(x, y, width, rows as f64 * self.metrics.line_height);
        self.needs_layout = false;
    }

    fn row_count(&self, text_width: f64) -> usize {
        if self.wrap {
            cell_count(&self.text)
                .div_ceil(self.metrics.cells_per_row(text_width))
                .max(1)
        } else {
            1
        }
    }

    fn cells_per_row(&self) -> Option<usize> {
        self.wrap
            .then(|| self.metrics.cells_per_row(self.bounds.width - self.margin_width))
    }

    /// Cell offset of the caret before `column`.
    fn cells_before(&self, column: usize) -> usize {
        cell_count(&self.text.chars().take(column).collect::<String>())
    }

    /// (row, cell within row) of a cell offset.
    fn place(&self, cells: usize) -> (usize, usize) {
        match self.cells_per_row() {
            Some(per_row) => (cells / per_row, cells % per_row),
            None => (0, cells),
        }
    }
}

impl LineRender for MonoLine {
    fn set_text(&mut self, segments: &[StyledSegment], x_translate: f64, wrap: bool, style: &StyleKey) {
        self.text = line_text(segments);
        self.x_translate = x_translate;
        self.wrap = wrap;
        if self.style != *style {
            self.style = style.clone();
            self.metrics = MonoMetrics::from_style(style);
        }
        self.needs_layout = true;
    }

    fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    fn uses_style(&self, style: &StyleKey) -> bool {
        self.style == *style
    }

    fn caret_bounds(&self, column: usize) -> Option<Rect> {
        let (row, cell) = self.place(self.cells_before(column));
        let lh = self.metrics.line_height;
        Some(Rect::new(cell as f64 * self.metrics.cell_width, row as f64 * lh, 0.0, lh))
    }

    fn range_bounds(&self, start: usize, end: usize) -> Option<Rect> {
        let (start, end) = (start.min(end), start.max(end));
        let (row_s, cell_s) = self.place(self.cells_before(start));
        let (row_e, cell_e) = self.place(self.cells_before(end));
        let cw = self.metrics.cell_width;
        let lh = self.metrics.line_height;
        if row_s == row_e {
            Some(Rect::new(
                cell_s as f64 * cw,
                row_s as f64 * lh,
                (cell_e - cell_s) as f64 * cw,
                lh,
            ))
        } else {
            let per_row = self.cells_per_row().unwrap_or(cell_e);
            Some(Rect::new(
                0.0,
                row_s as f64 * lh,
                per_row as f64 * cw,
                (row_e - row_s + 1) as f64 * lh,
            ))
        }
    }

    fn hit_test(&self, point: Point) -> Option<usize> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let row = (point.y / self.metrics.line_height).floor() as usize;
        let cell_in_row = (point.x / self.metrics.cell_width).round() as usize;
        let target = match self.cells_per_row() {
            Some(per_row) => row * per_row + cell_in_row.min(per_row),
            None => cell_in_row,
        };

        let mut cells = 0;
        for (column, c) in self.text.chars().enumerate() {
            let w = c.width().unwrap_or(0);
            // Nearest boundary: past the midpoint of a glyph snaps after it.
            if target < cells + w.div_ceil(2).max(1) {
                return Some(column);
            }
            cells += w;
        }
        Some(self.text.chars().count())
    }

    fn layout_bounds(&self) -> Rect {
        self.bounds
    }

    fn single_text_height(&self) -> f64 {
        self.metrics.line_height
    }

    fn font_size_changed(&mut self, style: &StyleKey) {
        self.style = style.clone();
        self.metrics = MonoMetrics::from_style(style);
        self.needs_layout = true;
    }

    fn set_scope_backgrounds(&mut self, spans: Option<&[BackgroundSpan]>) {
        self.backgrounds = spans.map(<[BackgroundSpan]>::to_vec).unwrap_or_default();
    }

    fn hide_error_underline(&mut self) {
        self.error_underline = false;
    }

    fn set_pseudoclass(&mut self, name: &str, on: bool) {
        if on {
            self.pseudoclasses.insert(name.to_string());
        } else {
            self.pseudoclasses.remove(name);
        }
    }
}

/// Creates [`MonoLine`] handles and counts how many it made.
#[derive(Debug, Default)]
pub struct MonoFactory {
    margin_width: f64,
    created: usize,
}

impl MonoFactory {
    /// Factory whose lines reserve `margin_width` pixels for the left margin.
    pub fn new(margin_width: f64) -> Self {
        Self {
            margin_width,
            created: 0,
        }
    }

    /// Number of handles created so far.
    pub fn created(&self) -> usize {
        self.created
    }
}

impl LineFactory for MonoFactory {
    type Line = MonoLine;

    fn create(&mut self, index: usize, wrap: bool, events: LineEvents) -> MonoLine {
        self.created += 1;
        MonoLine::new(index, wrap, self.margin_width, events)
    }
}

/// Host layout pass: stack lines top to bottom starting at `top`.
pub fn layout_lines<'a>(lines: impl IntoIterator<Item = (usize, &'a mut MonoLine)>, top: f64, width: f64) {
    let mut y = top;
    for (_, line) in lines {
        line.layout(0.0, y, width);
        y += line.layout_bounds().height;
    }
}
