//! End-to-end viewport scenarios over the monospace collaborators.

use lineview::model::{LineStarts, Point, StyleKey, StyledSegment, ViewportError};
use lineview::render::monospace::{layout_lines, MonoFactory, MonoMeasurer};
use lineview::view_state::{DisplayOptions, LineDisplay, ViewportState};
use std::cell::RefCell;
use std::rc::Rc;

type Display = LineDisplay<MonoFactory, MonoMeasurer>;

// ===== Test Helpers =====

fn texts(lines: usize) -> Vec<String> {
    (0..lines).map(|i| format!("line {i}")).collect()
}

fn document(texts: &[String]) -> Vec<Vec<StyledSegment>> {
    texts.iter().map(|t| vec![StyledSegment::plain(t.as_str())]).collect()
}

fn display() -> Display {
    LineDisplay::new(MonoFactory::new(24.0), MonoMeasurer::snapping(), DisplayOptions::default())
        .with_style(StyleKey::new("font-size: 10px"))
}

fn shown(display: &Display) -> Option<(usize, usize)> {
    display.line_range_visible().inclusive()
}

// ===== Fixed-Height Scenarios =====

#[test]
fn hundred_lines_in_hundred_pixels() {
    let doc = document(&texts(100));
    let mut display = display();

    let lines = display.recalculate(&doc, 0.0, 400.0, 100.0, false);
    assert_eq!(lines.len(), 11, "Ten full lines plus one for partial visibility");
    assert_eq!(shown(&display), Some((0, 10)));
}

#[test]
fn scroll_by_fifty_pixels_moves_five_lines() {
    let doc = document(&texts(100));
    let mut display = display();
    display.recalculate(&doc, 0.0, 400.0, 100.0, false);

    display.scroll_by(-50.0, doc.len(), 100.0);
    assert_eq!(display.viewport(), &ViewportState::at(5, 0.0, 10.0));
}

#[test]
fn ensure_last_line_visible() {
    let doc = document(&texts(100));
    let mut display = display();
    display.recalculate(&doc, 0.0, 400.0, 100.0, false);

    display.ensure_line_visible(99, 100.0, doc.len());
    assert_eq!(display.viewport(), &ViewportState::at(90, 0.0, 10.0));
    assert!(display.is_line_visible(99), "Visible as soon as the anchor moves");

    display.recalculate(&doc, 0.0, 400.0, 100.0, false);
    assert_eq!(shown(&display), Some((90, 99)));
}

#[test]
fn ensure_line_with_partial_top_line() {
    // 84px at 10px per line: line 6 pulled up by 6px so line 14 ends at the bottom.
    let doc = document(&texts(100));
    let mut display = display();
    display.recalculate(&doc, 0.0, 400.0, 84.0, false);

    display.ensure_line_visible(14, 84.0, doc.len());
    assert_eq!(display.first_visible_line_index(), 6);
    assert_eq!(display.first_visible_line_offset(), -6.0);

    display.recalculate(&doc, 0.0, 400.0, 84.0, false);
    assert!(display.is_line_visible(14));
    assert_eq!(shown(&display), Some((6, 15)));
}

#[test]
fn deleting_most_of_the_document_scrolls_back() {
    let mut display = display();
    let long = document(&texts(100));
    display.scroll_to(48, 0.0);
    display.recalculate(&long, 0.0, 400.0, 100.0, false);

    // The document shrinks to 50 lines; only 48 and 49 remain on screen.
    let short = document(&texts(50));
    display.recalculate(&short, 0.0, 400.0, 100.0, false);
    assert_eq!(shown(&display), Some((48, 49)));

    display.ensure_line_visible(49, 100.0, short.len());
    display.recalculate(&short, 0.0, 400.0, 100.0, false);
    assert_eq!(shown(&display), Some((41, 49)), "Pane is filled again");
}

#[test]
fn zero_height_pane_defers_ensure() {
    let doc = document(&texts(100));
    let mut display = display();
    display.recalculate(&doc, 0.0, 400.0, 100.0, false);

    display.ensure_line_visible(80, 0.0, doc.len());
    assert_eq!(display.first_visible_line_index(), 0);
}

#[test]
fn hidden_line_access_reports_range() {
    let doc = document(&texts(100));
    let mut display = display();
    display.recalculate(&doc, 0.0, 400.0, 100.0, false);

    let err = display.get_visible_line(42).unwrap_err();
    assert_eq!(
        err,
        ViewportError::LineNotVisible {
            requested: 42,
            first: 0,
            end: 11
        }
    );
    assert!(err.to_string().contains("42"));
}

// ===== Wrapping =====

#[test]
fn wrapped_lines_fill_by_measured_height() {
    // 6px cells: 60px of text area fits 10 cells per row.
    let texts = vec!["x".repeat(25), "short".to_string(), "y".repeat(15), "z".to_string()];
    let doc = document(&texts);
    let mut display = display();

    // 30 + 10 + 20 = 60px reaches the 50px pane at line 2.
    display.recalculate(&doc, 0.0, 60.0, 50.0, true);
    assert_eq!(shown(&display), Some((0, 2)));
}

// ===== Style Changes =====

#[test]
fn style_change_invalidates_widths_and_height() {
    let style = Rc::new(RefCell::new(StyleKey::new("font-size: 10px")));
    let source = style.clone();
    let mut display = display().with_style_source(move || source.borrow().clone());

    assert_eq!(display.calculate_line_width("abcd"), 24.0);
    assert_eq!(display.calculate_line_height(), 10.0);

    *style.borrow_mut() = StyleKey::new("font-size: 20px");
    assert_eq!(display.calculate_line_width("abcd"), 48.0);
    assert_eq!(display.calculate_line_height(), 20.0);
}

#[test]
fn style_change_updates_line_height_estimate_on_recalculate() {
    let style = Rc::new(RefCell::new(StyleKey::new("font-size: 10px")));
    let source = style.clone();
    let mut display = display().with_style_source(move || source.borrow().clone());
    let doc = document(&texts(100));

    display.recalculate(&doc, 0.0, 400.0, 100.0, false);
    *style.borrow_mut() = StyleKey::new("font-size: 20px");
    display.recalculate(&doc, 0.0, 400.0, 100.0, false);

    assert_eq!(display.line_height(), 20.0);
    assert_eq!(shown(&display), Some((0, 5)));
}

// ===== Host Geometry =====

#[test]
fn click_maps_to_line_and_column_after_scrolling() {
    let texts = texts(100);
    let doc = document(&texts);
    let mut display = display();
    display.scroll_to(20, 0.0);
    display.recalculate(&doc, 0.0, 400.0, 100.0, false);
    layout_lines(display.visible_lines_mut(), 0.0, 400.0);

    // Third row on screen, after "li".
    let hit = display.caret_position_for_local_point(Point::new(24.0 + 12.0, 25.0));
    assert_eq!(hit, Some((22, 2)));
}

#[test]
fn selection_bounds_only_cover_visible_lines() {
    let texts = texts(100);
    let doc = document(&texts);
    let positions = LineStarts::from_lines(&texts[..]);
    let mut display = display();
    display.scroll_to(10, 0.0);
    display.recalculate(&doc, 0.0, 400.0, 30.0, false);
    layout_lines(display.visible_lines_mut(), 0.0, 400.0);

    // The whole document is selected; only 10..=13 are materialized.
    let rects = display.bounds_for_range(&positions, 0, positions.len());
    assert_eq!(rects.len(), 4);
    assert!(rects.windows(2).all(|w| w[0].y < w[1].y));
}
