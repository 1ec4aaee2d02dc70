//! Error types for lineview.
//!
//! Errors are structured `thiserror` enums that compose via `?` and `From`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error for the `lineview` binary
//!   - [`ConfigError`](crate::config::ConfigError) - config file read/parse failures
//!   - [`LoggingError`](crate::logging::LoggingError) - tracing initialisation failures
//!   - [`ViewportError`] - contract violations against the visible window
//!   - I/O failures reading the input document
//! - [`MeasureError`] - off-screen measurement failures, never surfaced past the
//!   measurement cache
//!
//! # Recovery Strategy
//!
//! Only [`ViewportError`] reaches library callers, and it signals a programmer error
//! (querying a line without checking visibility first). Measurement failures degrade
//! to the uncached path; document shrinkage is silently corrected.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Contract violations against the currently materialized window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewportError {
    /// A line outside the visible window was requested through the direct accessor.
    ///
    /// Callers must check [`LineDisplay::is_line_visible`](crate::view_state::LineDisplay::is_line_visible)
    /// before asking for the handle. The range is reported half-open, `first..end`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lineview::model::error::ViewportError;
    ///
    /// let err = ViewportError::LineNotVisible { requested: 42, first: 0, end: 10 };
    /// assert!(err.to_string().contains("42"));
    /// assert!(err.to_string().contains("0 to 10"));
    /// ```
    #[error("Line {requested} is not visible. Visible range is {first} to {end}")]
    LineNotVisible {
        /// The document line index that was asked for.
        requested: usize,
        /// First visible line (inclusive).
        first: usize,
        /// One past the last visible line.
        end: usize,
    },
}

/// Failure while measuring a line off-screen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// The measurer could not produce a width for the given style.
    #[error("Failed to measure line under style {style:?}: {reason}")]
    Failed {
        /// Style the measurement was attempted under.
        style: String,
        /// Human-readable failure detail.
        reason: String,
    },
}

/// Top-level error for the `lineview` binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialised.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// A viewport contract was violated.
    #[error("Viewport error: {0}")]
    Viewport(#[from] ViewportError),

    /// The input document could not be read.
    #[error("Failed to read {path:?}: {source}")]
    Input {
        /// Path of the document.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The report could not be serialised.
    #[error("Failed to serialise report: {0}")]
    Report(#[from] serde_json::Error),
}
