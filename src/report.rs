//! Printable snapshot of the visible window.

use crate::render::monospace::{MonoFactory, MonoLine};
use crate::render::{LineMeasurer, LineRender};
use crate::view_state::{LineDisplay, ViewportState};
use serde::Serialize;

/// One visible line as laid out by the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLine {
    /// Document line index.
    pub index: usize,
    /// Top edge within the pane.
    pub top: f64,
    /// Laid-out height.
    pub height: f64,
    /// Plain text shown.
    pub text: String,
}

impl ReportLine {
    fn from_line(index: usize, line: &MonoLine) -> Self {
        let bounds = line.layout_bounds();
        Self {
            index,
            top: bounds.y,
            height: bounds.height,
            text: line.text().to_string(),
        }
    }
}

/// Snapshot of a display after recalculation and layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportReport {
    /// Lines in the document.
    pub line_count: usize,
    /// Anchor at capture time.
    pub viewport: ViewportState,
    /// First visible line, if any.
    pub first: Option<usize>,
    /// Last visible line (inclusive), if any.
    pub last: Option<usize>,
    /// Visible lines in order.
    pub lines: Vec<ReportLine>,
}

impl ViewportReport {
    /// Capture the current window of a monospace display.
    pub fn capture<M: LineMeasurer>(display: &LineDisplay<MonoFactory, M>, line_count: usize) -> Self {
        let range = display.line_range_visible().inclusive();
        Self {
            line_count,
            viewport: *display.viewport(),
            first: range.map(|(first, _)| first),
            last: range.map(|(_, last)| last),
            lines: display
                .visible_lines()
                .map(|(index, line)| ReportLine::from_line(index, line))
                .collect(),
        }
    }

    /// Human-readable rendering: a summary header then one row per line.
    pub fn to_text(&self) -> String {
        let header = match (self.first, self.last) {
            (Some(first), Some(last)) => format!(
                "lines {first}-{last} of {} | offset {:.1} | line height {:.1}",
                self.line_count, self.viewport.first_visible_line_offset, self.viewport.line_height_estimate
            ),
            _ => format!("no lines visible of {}", self.line_count),
        };

        std::iter::once(header)
            .chain(
                self.lines
                    .iter()
                    .map(|line| format!("L{} y={:.1} | {}", line.index, line.top, line.text)),
            )
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StyleKey, StyledSegment};
    use crate::render::monospace::{layout_lines, MonoMeasurer};
    use crate::view_state::DisplayOptions;

    fn shown(texts: &[&str], height: f64) -> ViewportReport {
        let doc: Vec<Vec<StyledSegment>> = texts.iter().map(|t| vec![StyledSegment::plain(*t)]).collect();
        let mut display = LineDisplay::new(MonoFactory::new(24.0), MonoMeasurer::snapping(), DisplayOptions::default())
            .with_style(StyleKey::new("font-size: 10px"));
        display.recalculate(&doc, 0.0, 300.0, height, false);
        layout_lines(display.visible_lines_mut(), 0.0, 300.0);
        ViewportReport::capture(&display, doc.len())
    }

    #[test]
    fn captures_visible_lines_with_positions() {
        let report = shown(&["alpha", "beta", "gamma"], 100.0);
        assert_eq!(report.first, Some(0));
        assert_eq!(report.last, Some(2));
        assert_eq!(report.lines[1].top, 10.0);
        assert_eq!(report.lines[2].text, "gamma");
    }

    #[test]
    fn text_rendering() {
        let report = shown(&["alpha", "beta", "gamma"], 100.0);
        insta::assert_snapshot!(report.to_text(), @r"
        lines 0-2 of 3 | offset 0.0 | line height 10.0
        L0 y=0.0 | alpha
        L1 y=10.0 | beta
        L2 y=20.0 | gamma
        ");
    }

    #[test]
    fn empty_document_header() {
        let report = shown(&[], 100.0);
        assert_eq!(report.to_text(), "no lines visible of 0");
        assert!(report.lines.is_empty());
    }

    #[test]
    fn serializes_to_json() {
        let report = shown(&["only"], 20.0);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["line_count"], 1);
        assert_eq!(json["lines"][0]["text"], "only");
        assert_eq!(json["viewport"]["first_visible_line_index"], 0);
    }
}
