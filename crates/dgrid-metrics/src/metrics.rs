//! The per-frame layout snapshot.

use std::collections::HashMap;

use dgrid_core::geometry::BoxCoordinates;
use dgrid_core::index::{self, ModelIndex, VisibleIndex};

use crate::cache::get_or;

/// Visible index to pixel size, rebuilt every layout pass.
pub type SizeMap = HashMap<VisibleIndex, f64>;

/// Visible index to pixel coordinate, rebuilt every layout pass.
pub type CoordinateMap = HashMap<VisibleIndex, f64>;

/// Model index to pixel size.
pub type ModelSizeMap = HashMap<ModelIndex, f64>;

/// Visible index to the model index it pulls from.
pub type VisibleToModelMap = HashMap<VisibleIndex, ModelIndex>;

/// Complete derived geometry for one layout pass.
///
/// Created fresh by [`GridMetricCalculator::get_metrics`] and never mutated
/// after return; renderers and hit-testers read it for the rest of the
/// frame. The model-indexed size maps are snapshots restricted to the
/// rows/columns present in this frame.
///
/// [`GridMetricCalculator::get_metrics`]: crate::calculator::GridMetricCalculator::get_metrics
#[derive(Debug, Clone, Default)]
pub struct GridMetrics {
    // Row/column defaults and counts from theme and model.
    pub row_height: f64,
    pub row_header_width: f64,
    pub row_footer_width: f64,
    pub row_count: usize,
    pub column_width: f64,
    pub column_count: usize,
    pub column_header_height: f64,

    // Floating row and column counts.
    pub floating_top_row_count: usize,
    pub floating_bottom_row_count: usize,
    pub floating_left_column_count: usize,
    pub floating_right_column_count: usize,

    // The grid offset from the canvas top left.
    pub grid_x: f64,
    pub grid_y: f64,

    // Index of the first non-hidden row/column.
    pub first_row: VisibleIndex,
    pub first_column: VisibleIndex,

    // Indent reserved for tree expand boxes, when applicable.
    pub tree_padding_x: f64,
    pub tree_padding_y: f64,

    // The viewport currently visible, limited by data size.
    pub left: VisibleIndex,
    pub top: VisibleIndex,
    pub bottom: VisibleIndex,
    pub right: VisibleIndex,
    pub left_offset: f64,
    pub top_offset: f64,

    // Bounds that are fully visible, not occluded by floats or scroll bars.
    pub top_visible: VisibleIndex,
    pub left_visible: VisibleIndex,
    pub bottom_visible: VisibleIndex,
    pub right_visible: VisibleIndex,

    // Bottom/right of the viewport, not limited by data size.
    pub bottom_viewport: VisibleIndex,
    pub right_viewport: VisibleIndex,

    // Canvas dimensions.
    pub width: f64,
    pub height: f64,

    // Max x/y coordinate of the grid content (headers excluded).
    pub max_x: f64,
    pub max_y: f64,

    // Last valid column/row that can be the left/top of the viewport.
    pub last_left: VisibleIndex,
    pub last_top: VisibleIndex,

    // Scroll bar geometry.
    pub bar_width: f64,
    pub bar_height: f64,
    pub bar_left: f64,
    pub bar_top: f64,
    pub handle_width: f64,
    pub handle_height: f64,
    pub has_horizontal_bar: bool,
    pub has_vertical_bar: bool,
    pub vertical_bar_width: f64,
    pub horizontal_bar_height: f64,

    // Scroll handle positions along their bars.
    pub scroll_x: f64,
    pub scroll_y: f64,

    pub scrollable_content_width: f64,
    pub scrollable_content_height: f64,
    pub scrollable_viewport_width: f64,
    pub scrollable_viewport_height: f64,

    // Visible rows/columns in display order, then floating, then both.
    pub visible_rows: Vec<VisibleIndex>,
    pub visible_columns: Vec<VisibleIndex>,
    pub floating_rows: Vec<VisibleIndex>,
    pub floating_columns: Vec<VisibleIndex>,
    pub all_rows: Vec<VisibleIndex>,
    pub all_columns: Vec<VisibleIndex>,

    // Sizes of the visible and floating rows/columns.
    pub visible_row_heights: SizeMap,
    pub visible_column_widths: SizeMap,

    // Total thickness of each floating region.
    pub floating_top_height: f64,
    pub floating_bottom_height: f64,
    pub floating_left_width: f64,
    pub floating_right_width: f64,

    // Coordinates of the rows/columns from the grid top left.
    pub visible_row_ys: CoordinateMap,
    pub visible_column_xs: CoordinateMap,

    // Click regions for expanding/collapsing tree rows.
    pub visible_row_tree_boxes: HashMap<VisibleIndex, BoxCoordinates>,

    // Mapping from visible indexes to the model indexes they pull from.
    pub model_rows: VisibleToModelMap,
    pub model_columns: VisibleToModelMap,

    // Font string to single-character width.
    pub font_widths: HashMap<String, f64>,

    // User-set overrides, restricted to this frame's model indexes.
    pub user_column_widths: ModelSizeMap,
    pub user_row_heights: ModelSizeMap,

    // Content-derived sizes, restricted to this frame's model indexes.
    pub calculated_column_widths: ModelSizeMap,
    pub calculated_row_heights: ModelSizeMap,

    pub column_header_max_depth: usize,
}

impl GridMetrics {
    /// Whether the column is hidden (zero width).
    #[must_use]
    pub fn is_column_hidden(&self, column: VisibleIndex) -> bool {
        is_item_hidden(column, &self.visible_column_widths)
    }

    /// Whether the row is hidden (zero height).
    #[must_use]
    pub fn is_row_hidden(&self, row: VisibleIndex) -> bool {
        is_item_hidden(row, &self.visible_row_heights)
    }

    /// Whether the row is pinned to the top or bottom edge.
    #[must_use]
    pub fn is_floating_row(&self, row: VisibleIndex) -> bool {
        row < self.floating_top_row_count
            || row >= self.row_count.saturating_sub(self.floating_bottom_row_count)
    }

    /// Whether the column is pinned to the left or right edge.
    #[must_use]
    pub fn is_floating_column(&self, column: VisibleIndex) -> bool {
        column < self.floating_left_column_count
            || column >= self.column_count.saturating_sub(self.floating_right_column_count)
    }

    /// All columns collapsed under the same separator as `column`.
    ///
    /// With columns 1..=5 where 2, 3, 4 are hidden, querying 4 returns
    /// `[4, 3, 2]`: the run of hidden columns walking backward.
    #[must_use]
    pub fn hidden_columns(&self, column: VisibleIndex) -> Vec<VisibleIndex> {
        hidden_items(column, &self.visible_column_widths, &self.visible_columns)
    }

    /// All rows collapsed under the same separator as `row`.
    #[must_use]
    pub fn hidden_rows(&self, row: VisibleIndex) -> Vec<VisibleIndex> {
        hidden_items(row, &self.visible_row_heights, &self.visible_rows)
    }

    /// The nearest column before `column` that is not hidden.
    #[must_use]
    pub fn next_shown_column(&self, column: VisibleIndex) -> Option<VisibleIndex> {
        next_shown_item(
            column,
            &self.model_columns,
            &self.visible_columns,
            &self.user_column_widths,
        )
    }

    /// The nearest row before `row` that is not hidden.
    #[must_use]
    pub fn next_shown_row(&self, row: VisibleIndex) -> Option<VisibleIndex> {
        next_shown_item(
            row,
            &self.model_rows,
            &self.visible_rows,
            &self.user_row_heights,
        )
    }

    /// The column at canvas x coordinate, or `None` outside all columns.
    ///
    /// Floating columns are checked first since they render on top.
    #[must_use]
    pub fn column_at_x(&self, x: f64) -> Option<VisibleIndex> {
        if x < self.grid_x {
            return None;
        }
        item_at_offset(
            x - self.grid_x,
            self.floating_left_column_count,
            self.floating_right_column_count,
            self.column_count,
            &self.visible_columns,
            &self.visible_column_xs,
            &self.visible_column_widths,
        )
    }

    /// The row at canvas y coordinate, or `None` outside all rows.
    #[must_use]
    pub fn row_at_y(&self, y: f64) -> Option<VisibleIndex> {
        if y < self.grid_y {
            return None;
        }
        item_at_offset(
            y - self.grid_y,
            self.floating_top_row_count,
            self.floating_bottom_row_count,
            self.row_count,
            &self.visible_rows,
            &self.visible_row_ys,
            &self.visible_row_heights,
        )
    }
}

fn is_item_hidden(item: VisibleIndex, visible_sizes: &SizeMap) -> bool {
    visible_sizes.get(&item) == Some(&0.0)
}

fn hidden_items(
    item: VisibleIndex,
    visible_sizes: &SizeMap,
    visible_items: &[VisibleIndex],
) -> Vec<VisibleIndex> {
    if !is_item_hidden(item, visible_sizes) {
        return Vec::new();
    }

    let mut hidden = vec![item];
    let Some(position) = visible_items.iter().position(|&v| v == item) else {
        return hidden;
    };
    for &previous in visible_items[..position].iter().rev() {
        if !is_item_hidden(previous, visible_sizes) {
            break;
        }
        hidden.push(previous);
    }
    hidden
}

fn next_shown_item(
    start: VisibleIndex,
    model_indexes: &VisibleToModelMap,
    visible_items: &[VisibleIndex],
    user_sizes: &ModelSizeMap,
) -> Option<VisibleIndex> {
    let position = visible_items.iter().position(|&v| v == start).unwrap_or(0);
    visible_items[..position]
        .iter()
        .rev()
        .find(|&&item| {
            model_indexes
                .get(&item)
                .is_some_and(|model| user_sizes.get(model) != Some(&0.0))
        })
        .copied()
}

fn is_in_item(
    item: VisibleIndex,
    coordinates: &CoordinateMap,
    sizes: &SizeMap,
    offset: f64,
) -> bool {
    let start = get_or(coordinates, item, 0.0);
    let size = get_or(sizes, item, 0.0);
    start <= offset && offset <= start + size
}

#[allow(clippy::too_many_arguments)]
fn item_at_offset(
    offset: f64,
    floating_start: usize,
    floating_end: usize,
    item_count: usize,
    items: &[VisibleIndex],
    coordinates: &CoordinateMap,
    sizes: &SizeMap,
) -> Option<VisibleIndex> {
    index::floating_indices(floating_start, floating_end, item_count)
        .find(|&item| is_in_item(item, coordinates, sizes, offset))
        .or_else(|| {
            items
                .iter()
                .copied()
                .find(|&item| is_in_item(item, coordinates, sizes, offset))
        })
}
