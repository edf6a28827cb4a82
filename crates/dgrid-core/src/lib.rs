#![forbid(unsafe_code)]

//! Foundation types for the dgrid metrics engine.
//!
//! This crate holds everything the engine consumes but does not compute:
//!
//! - [`model::GridModel`] - the data source contract, with the optional
//!   [`model::ExpandableRows`] capability for tree grids
//! - [`theme::GridTheme`] - layout-relevant sizes, paddings, and flags
//! - [`index`] - visible/model index translation under reorder operations
//! - [`measure::TextMeasure`] - the text-measurement contract
//! - [`geometry`] - small plain structs shared across the workspace

pub mod geometry;
pub mod index;
pub mod measure;
#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;
pub mod model;
pub mod theme;

pub use geometry::{BoxCoordinates, GridPoint};
pub use index::{ModelIndex, MoveOperation, MoveOperations, MoveToken, VisibleIndex};
pub use measure::{MonospaceMeasure, TextMeasure};
pub use model::{ExpandableRows, GridModel};
pub use theme::GridTheme;
