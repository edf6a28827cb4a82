//! Mouse interaction handlers for grid header separators.
//!
//! A [`SeparatorDragHandler`] drives one resize gesture at a time: it
//! hit-tests the pointer against header boundaries, tracks the drag
//! through hidden-item reveals and cascading resizes, and writes the
//! resulting size overrides back through the host's
//! [`GridMetricCalculator`](dgrid_metrics::GridMetricCalculator).
//! [`ColumnAxis`] and [`RowAxis`] bind the shared machinery to each
//! direction.

#![forbid(unsafe_code)]

pub mod column;
pub mod row;
pub mod separator;

pub use column::{ColumnAxis, ColumnSeparatorHandler};
pub use row::{RowAxis, RowSeparatorHandler};
pub use separator::{GridSeparator, SeparatorAxis, SeparatorDragHandler, SeparatorHost};
