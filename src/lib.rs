//! Line View (lineview)
//!
//! Virtualized viewport for a multi-line text editor: decides which
//! contiguous block of lines is visible, materializes render handles only for
//! that block, tracks the fractional scroll position and caches line metrics
//! for the active style.
//!
//! The core lives in [`view_state`]; rendering and measurement are delegated
//! to the collaborator traits in [`render`].

pub mod config;
pub mod logging;
pub mod model;
pub mod render;
pub mod report;
pub mod view_state;
