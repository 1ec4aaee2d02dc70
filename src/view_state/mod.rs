//! View-state layer - windowing, scrolling and measurement caching
//!
//! This module decides which contiguous block of document lines is visible,
//! keeps one render handle per visible line, tracks the fractional scroll
//! anchor and caches line metrics for the active style.
//!
//! # Module Structure
//!
//! - `viewport`: ViewportState - anchor line, pixel offset, line height estimate
//! - `scroll`: scroll controller operations on ViewportState
//! - `visible_lines`: VisibleLineStore - contiguous deque of render handles
//! - `visible_range`: VisibleRange - result of a recalculation
//! - `lru`: LruMap - bounded least-recently-used map
//! - `measure`: MeasurementCache - style-scoped line height and width cache
//! - `listener`: LineDisplayListener - rendered-range observers
//! - `display`: LineDisplay - recalculation engine and queries

pub mod display;
pub mod listener;
pub mod lru;
pub mod measure;
pub mod scroll;
pub mod viewport;
pub mod visible_lines;
pub mod visible_range;

pub use display::{DisplayOptions, LineDisplay};
pub use listener::{LineDisplayListener, ListenerRegistry};
pub use lru::LruMap;
pub use measure::{MeasurementCache, DEFAULT_WIDTH_CACHE_CAPACITY};
pub use viewport::ViewportState;
pub use visible_lines::VisibleLineStore;
pub use visible_range::VisibleRange;
