//! Measurement cache for line metrics under the active style.
//!
//! Holds one representative line height and a bounded LRU of line widths, both
//! valid for a single [`StyleKey`]. Any change of style discards everything.

use super::lru::LruMap;
use crate::model::{StyleKey, StyledSegment};
use crate::render::LineMeasurer;
use tracing::{error, info, warn};

/// Default bound on cached line widths.
pub const DEFAULT_WIDTH_CACHE_CAPACITY: usize = 400;

/// Two-character probe covering ascender and descender.
const HEIGHT_PROBE: &str = "Xy";

/// Cached line metrics for one style.
#[derive(Debug, Clone)]
pub struct MeasurementCache {
    cached_for_style: Option<StyleKey>,
    cached_height: f64,
    widths: LruMap<String, f64>,
}

impl MeasurementCache {
    /// Create an empty cache retaining at most `capacity` widths.
    pub fn new(capacity: usize) -> Self {
        Self {
            cached_for_style: None,
            cached_height: 0.0,
            widths: LruMap::new(capacity),
        }
    }

    /// Style the cached values belong to, if any have been computed.
    pub fn cached_style(&self) -> Option<&StyleKey> {
        self.cached_for_style.as_ref()
    }

    /// Number of cached widths.
    pub fn cached_width_count(&self) -> usize {
        self.widths.len()
    }

    /// Height of a representative single line under `style`.
    ///
    /// Revalidates the cache: when `style` differs from the cached style, all
    /// widths are discarded and the height is re-measured from the probe.
    pub fn line_height<M: LineMeasurer>(&mut self, measurer: &M, style: &StyleKey) -> f64 {
        if self.cached_for_style.as_ref() != Some(style) {
            info!(style = %style, cached = self.widths.len(), "Style changed, invalidating line metrics");
            self.cached_for_style = Some(style.clone());
            self.widths.clear();
            self.cached_height = Self::content_height(measurer, &[StyledSegment::plain(HEIGHT_PROBE)], None, style);
        }
        self.cached_height
    }

    /// Natural width of `text` under `style`.
    ///
    /// Never fails: a failed cached measurement falls back to a direct one, and
    /// a second failure degrades to zero width.
    pub fn line_width<M: LineMeasurer>(&mut self, measurer: &M, style: &StyleKey, text: &str) -> f64 {
        // Revalidates the cache against the current style.
        self.line_height(measurer, style);

        let key = text.to_string();
        match self
            .widths
            .get_or_try_insert_with(&key, || measurer.measure_width(text, style))
        {
            Ok(width) => width,
            Err(err) => {
                warn!(error = %err, "Cached width measurement failed, measuring directly");
                measurer.measure_width(text, style).unwrap_or_else(|err| {
                    error!(error = %err, len = text.len(), "Direct width measurement failed");
                    0.0
                })
            }
        }
    }

    /// Height of `content` wrapped at `max_width` (unwrapped when `None`).
    ///
    /// Not cached: wrapped heights depend on the width as well as the text.
    pub fn content_height<M: LineMeasurer>(
        measurer: &M,
        content: &[StyledSegment],
        max_width: Option<f64>,
        style: &StyleKey,
    ) -> f64 {
        measurer.measure_height(content, max_width, style)
    }
}

impl Default for MeasurementCache {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MeasureError;
    use std::cell::Cell;

    /// Measurer returning `text.len() * per_char` and counting calls.
    struct CountingMeasurer {
        per_char: Cell<f64>,
        width_calls: Cell<usize>,
        height_calls: Cell<usize>,
        fail_first: Cell<usize>,
    }

    impl CountingMeasurer {
        fn new(per_char: f64) -> Self {
            Self {
                per_char: Cell::new(per_char),
                width_calls: Cell::new(0),
                height_calls: Cell::new(0),
                fail_first: Cell::new(0),
            }
        }
    }

    impl LineMeasurer for CountingMeasurer {
        fn measure_width(&self, text: &str, style: &StyleKey) -> Result<f64, MeasureError> {
            self.width_calls.set(self.width_calls.get() + 1);
            if self.fail_first.get() > 0 {
                self.fail_first.set(self.fail_first.get() - 1);
                return Err(MeasureError::Failed {
                    style: style.to_string(),
                    reason: "scene unavailable".to_string(),
                });
            }
            Ok(text.len() as f64 * self.per_char.get())
        }

        fn measure_height(&self, _content: &[StyledSegment], _max_width: Option<f64>, style: &StyleKey) -> f64 {
            self.height_calls.set(self.height_calls.get() + 1);
            if style.as_str() == "big" {
                20.0
            } else {
                10.0
            }
        }
    }

    mod height {
        use super::*;

        #[test]
        fn measured_once_per_style() {
            let m = CountingMeasurer::new(1.0);
            let mut cache = MeasurementCache::new(10);
            let style = StyleKey::new("small");

            assert_eq!(cache.line_height(&m, &style), 10.0);
            assert_eq!(cache.line_height(&m, &style), 10.0);
            assert_eq!(m.height_calls.get(), 1);
            assert_eq!(cache.cached_style(), Some(&style));
        }

        #[test]
        fn remeasured_after_style_change() {
            let m = CountingMeasurer::new(1.0);
            let mut cache = MeasurementCache::new(10);

            assert_eq!(cache.line_height(&m, &StyleKey::new("small")), 10.0);
            assert_eq!(cache.line_height(&m, &StyleKey::new("big")), 20.0);
            assert_eq!(m.height_calls.get(), 2);
        }
    }

    mod width {
        use super::*;

        #[test]
        fn cached_per_text() {
            let m = CountingMeasurer::new(2.0);
            let mut cache = MeasurementCache::new(10);
            let style = StyleKey::new("small");

            assert_eq!(cache.line_width(&m, &style, "abc"), 6.0);
            assert_eq!(cache.line_width(&m, &style, "abc"), 6.0);
            assert_eq!(m.width_calls.get(), 1);
            assert_eq!(cache.cached_width_count(), 1);
        }

        #[test]
        fn style_change_forces_remeasure() {
            let m = CountingMeasurer::new(2.0);
            let mut cache = MeasurementCache::new(10);

            assert_eq!(cache.line_width(&m, &StyleKey::new("small"), "abc"), 6.0);
            m.per_char.set(5.0);
            assert_eq!(
                cache.line_width(&m, &StyleKey::new("big"), "abc"),
                15.0,
                "Stale width must not survive a style change"
            );
            assert_eq!(m.width_calls.get(), 2);
        }

        #[test]
        fn bounded_by_capacity() {
            let m = CountingMeasurer::new(1.0);
            let mut cache = MeasurementCache::new(2);
            let style = StyleKey::new("small");
            for text in ["a", "bb", "ccc"] {
                cache.line_width(&m, &style, text);
            }
            assert_eq!(cache.cached_width_count(), 2);
        }

        #[test]
        fn failure_falls_back_to_direct_measurement() {
            let m = CountingMeasurer::new(3.0);
            m.fail_first.set(1);
            let mut cache = MeasurementCache::new(10);

            assert_eq!(cache.line_width(&m, &StyleKey::new("small"), "ab"), 6.0);
            assert_eq!(m.width_calls.get(), 2);
            assert_eq!(cache.cached_width_count(), 0, "Failures are not cached");
        }

        #[test]
        fn double_failure_degrades_to_zero() {
            let m = CountingMeasurer::new(3.0);
            m.fail_first.set(2);
            let mut cache = MeasurementCache::new(10);

            assert_eq!(cache.line_width(&m, &StyleKey::new("small"), "ab"), 0.0);
        }
    }

    #[test]
    fn default_capacity_is_400() {
        let cache = MeasurementCache::default();
        assert_eq!(cache.widths.capacity(), DEFAULT_WIDTH_CACHE_CAPACITY);
        assert_eq!(DEFAULT_WIDTH_CACHE_CAPACITY, 400);
    }
}
