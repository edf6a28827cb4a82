//! The data source contract consumed by the metrics engine.

use crate::index::ModelIndex;

/// Model for a grid.
///
/// All of these methods should return quickly; they are called many times
/// per layout pass. Data that must be loaded asynchronously should return
/// a placeholder immediately and refresh the grid later.
pub trait GridModel {
    /// Count of rows in the grid.
    fn row_count(&self) -> usize;

    /// Count of columns in the grid.
    fn column_count(&self) -> usize;

    /// Count of rows frozen (floating) at the top.
    fn floating_top_row_count(&self) -> usize {
        0
    }

    /// Count of rows frozen at the bottom.
    fn floating_bottom_row_count(&self) -> usize {
        0
    }

    /// Count of columns frozen at the left.
    fn floating_left_column_count(&self) -> usize {
        0
    }

    /// Count of columns frozen at the right.
    fn floating_right_column_count(&self) -> usize {
        0
    }

    /// How many column header levels are in the grid.
    ///
    /// Used for column grouping, where columns at depth 0 are the base
    /// columns. A grid with one level of grouping has a max depth of 2.
    fn column_header_max_depth(&self) -> usize {
        1
    }

    /// Text for the specified cell, or `None` for an empty cell.
    fn text_for_cell(&self, column: ModelIndex, row: ModelIndex) -> Option<String>;

    /// Text for the specified column header at the given depth.
    fn text_for_column_header(&self, column: ModelIndex, depth: usize) -> Option<String>;

    /// The expandable-rows capability, when this model supports tree rows.
    ///
    /// Checked once per operation that needs tree behavior; models without
    /// the capability use the default.
    fn expandable(&self) -> Option<&dyn ExpandableRows> {
        None
    }
}

/// Optional tree-row capability for a [`GridModel`].
pub trait ExpandableRows {
    /// Whether any row in the model can currently be expanded.
    fn has_expandable_rows(&self) -> bool;

    /// Whether the specified row can be expanded or collapsed.
    fn is_row_expandable(&self, row: ModelIndex) -> bool;

    /// Nesting depth of the specified row, 0 for top-level rows.
    fn depth_for_row(&self, row: ModelIndex) -> usize;
}
