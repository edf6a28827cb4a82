#![forbid(unsafe_code)]

//! Virtualized grid layout metrics.
//!
//! Each layout pass, the owning grid builds a [`GridMetricState`] (viewport
//! geometry, theme, model, scroll position, reorder operations) and asks a
//! long-lived [`GridMetricCalculator`] for a [`GridMetrics`] snapshot. The
//! snapshot carries every derived pixel value a renderer or hit-tester
//! needs: visible and floating row/column index lists, their sizes and
//! coordinates, scroll bar geometry, tree-box hit regions, and the
//! visible-to-model index maps for the frame.
//!
//! The calculator keeps model-indexed size caches alive across passes so
//! scrolling does not re-measure content, and trims them in bulk once they
//! exceed [`calculator::CACHE_SIZE`] entries.

pub mod cache;
pub mod calculator;
pub mod metrics;

pub use cache::{SizeCache, get_or, must_get};
pub use calculator::{GridMetricCalculator, GridMetricState};
pub use metrics::{CoordinateMap, GridMetrics, ModelSizeMap, SizeMap, VisibleToModelMap};
