//! Domain model types (pure).
//!
//! Plain data shared by the viewport core and its render collaborators.

pub mod document;
pub mod error;
pub mod geometry;
pub mod segment;

// Re-export for convenience
pub use document::LineStarts;
pub use error::{AppError, MeasureError, ViewportError};
pub use geometry::{Point, Rect};
pub use segment::{line_text, BackgroundSpan, StyleKey, StyledSegment};
