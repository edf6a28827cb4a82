//! Mock models for tests.

use std::collections::HashMap;

use crate::index::ModelIndex;
use crate::model::{ExpandableRows, GridModel};

/// A flat grid model with deterministic cell text.
///
/// Cell text defaults to `"{column},{row}"` and header text to
/// `"Column{column}"`; individual cells can be overridden.
#[derive(Debug, Clone)]
pub struct MockGridModel {
    pub row_count: usize,
    pub column_count: usize,
    pub floating_top_row_count: usize,
    pub floating_bottom_row_count: usize,
    pub floating_left_column_count: usize,
    pub floating_right_column_count: usize,
    pub column_header_max_depth: usize,
    cell_overrides: HashMap<(ModelIndex, ModelIndex), Option<String>>,
}

impl MockGridModel {
    #[must_use]
    pub fn new(column_count: usize, row_count: usize) -> Self {
        Self {
            row_count,
            column_count,
            floating_top_row_count: 0,
            floating_bottom_row_count: 0,
            floating_left_column_count: 0,
            floating_right_column_count: 0,
            column_header_max_depth: 1,
            cell_overrides: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_floating_rows(mut self, top: usize, bottom: usize) -> Self {
        self.floating_top_row_count = top;
        self.floating_bottom_row_count = bottom;
        self
    }

    #[must_use]
    pub fn with_floating_columns(mut self, left: usize, right: usize) -> Self {
        self.floating_left_column_count = left;
        self.floating_right_column_count = right;
        self
    }

    /// Override the text for one cell. `None` makes the cell empty.
    pub fn set_cell_text(&mut self, column: ModelIndex, row: ModelIndex, text: Option<&str>) {
        self.cell_overrides
            .insert((column, row), text.map(str::to_string));
    }
}

impl GridModel for MockGridModel {
    fn row_count(&self) -> usize {
        self.row_count
    }

    fn column_count(&self) -> usize {
        self.column_count
    }

    fn floating_top_row_count(&self) -> usize {
        self.floating_top_row_count
    }

    fn floating_bottom_row_count(&self) -> usize {
        self.floating_bottom_row_count
    }

    fn floating_left_column_count(&self) -> usize {
        self.floating_left_column_count
    }

    fn floating_right_column_count(&self) -> usize {
        self.floating_right_column_count
    }

    fn column_header_max_depth(&self) -> usize {
        self.column_header_max_depth
    }

    fn text_for_cell(&self, column: ModelIndex, row: ModelIndex) -> Option<String> {
        if let Some(text) = self.cell_overrides.get(&(column, row)) {
            return text.clone();
        }
        Some(format!("{column},{row}"))
    }

    fn text_for_column_header(&self, column: ModelIndex, _depth: usize) -> Option<String> {
        Some(format!("Column{column}"))
    }
}

/// A tree grid model with per-row depth and expandability.
#[derive(Debug, Clone)]
pub struct MockTreeGridModel {
    base: MockGridModel,
    depths: Vec<usize>,
    expandable: Vec<bool>,
}

impl MockTreeGridModel {
    /// `depths[row]` is the tree depth; `expandable[row]` marks rows with
    /// an expand/collapse box. Both are padded with zero/false.
    #[must_use]
    pub fn new(
        column_count: usize,
        row_count: usize,
        depths: Vec<usize>,
        expandable: Vec<bool>,
    ) -> Self {
        Self {
            base: MockGridModel::new(column_count, row_count),
            depths,
            expandable,
        }
    }
}

impl GridModel for MockTreeGridModel {
    fn row_count(&self) -> usize {
        self.base.row_count()
    }

    fn column_count(&self) -> usize {
        self.base.column_count()
    }

    fn text_for_cell(&self, column: ModelIndex, row: ModelIndex) -> Option<String> {
        self.base.text_for_cell(column, row)
    }

    fn text_for_column_header(&self, column: ModelIndex, depth: usize) -> Option<String> {
        self.base.text_for_column_header(column, depth)
    }

    fn expandable(&self) -> Option<&dyn ExpandableRows> {
        Some(self)
    }
}

impl ExpandableRows for MockTreeGridModel {
    fn has_expandable_rows(&self) -> bool {
        self.expandable.iter().any(|&e| e)
    }

    fn is_row_expandable(&self, row: ModelIndex) -> bool {
        self.expandable.get(row).copied().unwrap_or(false)
    }

    fn depth_for_row(&self, row: ModelIndex) -> usize {
        self.depths.get(row).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_cell_text_and_overrides() {
        let mut model = MockGridModel::new(3, 5);
        assert_eq!(model.text_for_cell(1, 2).as_deref(), Some("1,2"));
        model.set_cell_text(1, 2, Some("wide cell contents"));
        assert_eq!(model.text_for_cell(1, 2).as_deref(), Some("wide cell contents"));
        model.set_cell_text(0, 0, None);
        assert_eq!(model.text_for_cell(0, 0), None);
    }

    #[test]
    fn flat_model_has_no_tree_capability() {
        let model = MockGridModel::new(2, 2);
        assert!(model.expandable().is_none());
    }

    #[test]
    fn tree_model_reports_depths() {
        let model = MockTreeGridModel::new(
            2,
            4,
            vec![0, 1, 1, 0],
            vec![true, false, false, true],
        );
        let tree = model.expandable().unwrap();
        assert!(tree.has_expandable_rows());
        assert!(tree.is_row_expandable(0));
        assert!(!tree.is_row_expandable(1));
        assert_eq!(tree.depth_for_row(2), 1);
        assert_eq!(tree.depth_for_row(99), 0);
    }
}
