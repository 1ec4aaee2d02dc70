//! Styled line content and style tokens.

use serde::Serialize;
use std::fmt;

/// Opaque token describing the active font/CSS.
///
/// Equality of two keys defines measurement-cache validity: any change in the
/// token invalidates every cached width and the cached representative height.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct StyleKey(String);

impl StyleKey {
    /// Create a style key from any string-like description.
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    /// Raw style description.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StyleKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StyleKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A run of text sharing one set of style tags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledSegment {
    /// Style class names applied to the run (syntax token kinds and the like).
    pub tags: Vec<String>,
    /// Raw text of the run.
    pub text: String,
}

impl StyledSegment {
    /// Create a segment with the given tags.
    pub fn new(tags: Vec<String>, text: impl Into<String>) -> Self {
        Self {
            tags,
            text: text.into(),
        }
    }

    /// Create an untagged segment.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(Vec::new(), text)
    }
}

/// Concatenate the raw text of a line's segments.
pub fn line_text(segments: &[StyledSegment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

/// A precomputed background span for scope highlighting.
///
/// Positions are pixel offsets within the line's text area.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundSpan {
    /// Left edge in pixels.
    pub x: f64,
    /// Width in pixels.
    pub width: f64,
    /// Colour or CSS class name to paint with.
    pub color: String,
}

impl BackgroundSpan {
    /// Create a new background span.
    pub fn new(x: f64, width: f64, color: impl Into<String>) -> Self {
        Self {
            x,
            width,
            color: color.into(),
        }
    }
}
