//! Grid layout computation.
//!
//! [`GridMetricCalculator`] turns a [`GridMetricState`] (viewport, theme,
//! model, reorder lists) into a [`GridMetrics`] snapshot. It is long-lived:
//! user and content-derived sizes persist across passes, keyed by model
//! index so reordering does not discard them.

use std::collections::HashMap;

use dgrid_core::index::{self, ModelIndex, MoveOperations, MoveToken, VisibleIndex};
use dgrid_core::measure::TextMeasure;
use dgrid_core::model::GridModel;
use dgrid_core::theme::GridTheme;

use crate::cache::{SizeCache, get_or, must_get};
use crate::metrics::{CoordinateMap, GridMetrics, ModelSizeMap, SizeMap, VisibleToModelMap};

/// Entry cap on each model-indexed size cache before a bulk trim.
pub const CACHE_SIZE: usize = 10_000;

/// Maximum auto-sized column width as a fraction of the grid width.
pub const MAX_COLUMN_WIDTH: f64 = 0.8;

/// Everything a layout pass reads: viewport position and canvas size from
/// the grid, plus borrowed theme, model, measurement context, and the
/// current row/column reorder lists.
pub struct GridMetricState<'a> {
    /// The top/left cell of the scrolled viewport.
    pub left: VisibleIndex,
    pub top: VisibleIndex,

    /// Scroll offset in pixels within the top/left cell.
    pub left_offset: f64,
    pub top_offset: f64,

    /// Canvas dimensions.
    pub width: f64,
    pub height: f64,

    pub context: &'a mut dyn TextMeasure,
    pub theme: &'a GridTheme,
    pub model: &'a dyn GridModel,

    pub moved_rows: &'a MoveOperations,
    pub moved_columns: &'a MoveOperations,
}

/// Stateful layout calculator for a single grid.
#[derive(Debug)]
pub struct GridMetricCalculator {
    user_column_widths: SizeCache,
    user_row_heights: SizeCache,
    calculated_column_widths: SizeCache,
    calculated_row_heights: SizeCache,

    /// Font string to estimated single-character width.
    font_widths: HashMap<String, f64>,

    /// Memoized visible-to-model translations, cleared when the
    /// corresponding reorder list's token changes.
    model_rows: VisibleToModelMap,
    model_columns: VisibleToModelMap,
    moved_rows: MoveToken,
    moved_columns: MoveToken,
}

impl Default for GridMetricCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl GridMetricCalculator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            user_column_widths: SizeCache::new(),
            user_row_heights: SizeCache::new(),
            calculated_column_widths: SizeCache::new(),
            calculated_row_heights: SizeCache::new(),
            font_widths: HashMap::new(),
            model_rows: VisibleToModelMap::new(),
            model_columns: VisibleToModelMap::new(),
            moved_rows: MoveToken::NONE,
            moved_columns: MoveToken::NONE,
        }
    }

    /// Compute the full metrics for the provided state.
    pub fn get_metrics(&mut self, state: &mut GridMetricState<'_>) -> GridMetrics {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("get_metrics").entered();

        if state.moved_rows.token() != self.moved_rows {
            self.moved_rows = state.moved_rows.token();
            self.model_rows.clear();
        }
        if state.moved_columns.token() != self.moved_columns {
            self.moved_columns = state.moved_columns.token();
            self.model_columns.clear();
        }

        let theme = state.theme;
        let model = state.model;
        let GridMetricState {
            left,
            top,
            left_offset,
            top_offset,
            width,
            height,
            ..
        } = *state;

        let row_count = model.row_count();
        let column_count = model.column_count();
        let floating_top_row_count = model.floating_top_row_count();
        let floating_bottom_row_count = model.floating_bottom_row_count();
        let floating_left_column_count = model.floating_left_column_count();
        let floating_right_column_count = model.floating_right_column_count();
        let column_header_max_depth = model.column_header_max_depth();

        let first_row = self.first_row(state);
        let first_column = self.first_column(state);

        let grid_x = grid_x(state);
        let grid_y = grid_y(state);

        let tree_padding_x = self.calculate_tree_padding_x(state);
        // Trees on columns are not supported.
        let tree_padding_y = 0.0;

        let (visible_rows, mut visible_row_heights) = self.visible_row_heights(state);
        let (visible_columns, mut visible_column_widths) =
            self.visible_column_widths(state, first_column, tree_padding_x);

        // Fold the floating sizes in so every index in play resolves.
        visible_row_heights.extend(self.floating_row_heights(state));
        visible_column_widths.extend(self.floating_column_widths(state, first_column, tree_padding_x));

        let mut visible_column_xs =
            coordinates_for(&visible_column_widths, &visible_columns, left_offset);
        let mut visible_row_ys = coordinates_for(&visible_row_heights, &visible_rows, top_offset);

        let bottom = visible_rows.last().copied().unwrap_or(top);
        let right = visible_columns.last().copied().unwrap_or(left);

        let bottom_viewport = last_index_viewport(
            &visible_rows,
            &visible_row_ys,
            &visible_row_heights,
            height,
            theme.row_height,
        );
        let right_viewport = last_index_viewport(
            &visible_columns,
            &visible_column_xs,
            &visible_column_widths,
            width,
            theme.column_width,
        );

        let max_x = visible_column_widths.values().sum::<f64>() - left_offset;
        let max_y = visible_row_heights.values().sum::<f64>() - top_offset;

        let floating_bottom_height = floating_end_total(
            &visible_row_heights,
            floating_bottom_row_count,
            row_count,
        );

        let last_left = self.last_left(
            state,
            None,
            width - grid_x - theme.scroll_bar_size - theme.row_footer_width,
        );
        let last_top = self.last_top(
            state,
            None,
            height - grid_y - theme.scroll_bar_size - floating_bottom_height,
        );

        let scrollable_content_width = left_offset + max_x + theme.row_footer_width;
        let scrollable_content_height = top_offset + max_y;
        let scrollable_viewport_width = width - grid_x;
        let scrollable_viewport_height = height - grid_y;

        let has_horizontal_bar =
            last_left > 0 || scrollable_content_width > scrollable_viewport_width;
        let horizontal_bar_height = if has_horizontal_bar {
            theme.scroll_bar_size
        } else {
            0.0
        };
        let has_vertical_bar = last_top > 0
            || scrollable_content_height > scrollable_viewport_height - horizontal_bar_height;
        let vertical_bar_width = if has_vertical_bar {
            theme.scroll_bar_size
        } else {
            0.0
        };
        let bar_width = width - theme.row_header_width - vertical_bar_width;
        let bar_height = height - theme.column_header_height - horizontal_bar_height;
        let bar_left = theme.row_header_width;
        let bar_top = theme.column_header_height;

        let horizontal_handle_percent = if column_count == 1 {
            safe_ratio(bar_width, scrollable_content_width)
        } else if column_count > 1 {
            (column_count - last_left) as f64 / column_count as f64
        } else {
            0.0
        };
        let vertical_handle_percent = if row_count == 1 {
            safe_ratio(bar_height, scrollable_content_height)
        } else if row_count > 1 {
            (row_count - last_top) as f64 / row_count as f64
        } else {
            0.0
        };

        let handle_width = if has_horizontal_bar {
            clamp(
                bar_width * horizontal_handle_percent,
                theme.min_scroll_handle_size,
                bar_width - 1.0,
            )
        } else {
            0.0
        };
        let handle_height = if has_vertical_bar {
            clamp(
                bar_height * vertical_handle_percent,
                theme.min_scroll_handle_size,
                bar_height - 1.0,
            )
        } else {
            0.0
        };

        let left_column_width = get_or(&visible_column_widths, left, 0.0);
        let top_row_height = get_or(&visible_row_heights, top, 0.0);
        let left_offset_percent = safe_ratio(left_offset, left_column_width);
        let top_offset_percent = safe_ratio(top_offset, top_row_height);

        let horizontal_scroll_percent = if column_count == 1 {
            safe_ratio(left_offset, scrollable_content_width - scrollable_viewport_width)
        } else if last_left > 0 {
            (left as f64 + left_offset_percent) / last_left as f64
        } else {
            0.0
        };
        let vertical_scroll_percent = if row_count == 1 {
            safe_ratio(top_offset, scrollable_content_height - scrollable_viewport_height)
        } else if last_top > 0 {
            (top as f64 + top_offset_percent) / last_top as f64
        } else {
            0.0
        };

        let scroll_x = if has_horizontal_bar {
            horizontal_scroll_percent * (bar_width - handle_width)
        } else {
            0.0
        };
        let scroll_y = if has_vertical_bar {
            vertical_scroll_percent * (bar_height - handle_height)
        } else {
            0.0
        };

        // Floating sections render over the viewport, so their coordinates
        // override the scrolled ones.
        let mut floating_rows: Vec<VisibleIndex> = Vec::new();
        if floating_top_row_count > 0 || floating_bottom_row_count > 0 {
            floating_rows =
                index::floating_indices(floating_top_row_count, floating_bottom_row_count, row_count)
                    .collect();
            visible_row_ys.extend(floating_coordinates(
                floating_top_row_count,
                floating_bottom_row_count,
                row_count,
                (height - grid_y - horizontal_bar_height).floor(),
                &visible_row_heights,
            ));
        }

        let mut floating_columns: Vec<VisibleIndex> = Vec::new();
        if floating_left_column_count > 0 || floating_right_column_count > 0 {
            floating_columns = index::floating_indices(
                floating_left_column_count,
                floating_right_column_count,
                column_count,
            )
            .collect();
            visible_column_xs.extend(floating_coordinates(
                floating_left_column_count,
                floating_right_column_count,
                column_count,
                (width - grid_x - vertical_bar_width).floor(),
                &visible_column_widths,
            ));
        }

        let mut all_rows = visible_rows.clone();
        all_rows.extend_from_slice(&floating_rows);
        let mut all_columns = visible_columns.clone();
        all_columns.extend_from_slice(&floating_columns);

        let model_rows = self.model_rows_for(&all_rows, state);
        let model_columns = self.model_columns_for(&all_columns, state);

        let visible_row_tree_boxes =
            tree_boxes_for(&visible_row_heights, &model_rows, state.model, theme);

        let floating_top_height =
            floating_start_total(&visible_row_heights, floating_top_row_count);
        let floating_left_width =
            floating_start_total(&visible_column_widths, floating_left_column_count);
        let floating_right_width = floating_end_total(
            &visible_column_widths,
            floating_right_column_count,
            column_count,
        );

        let top_visible = first_past(&visible_rows, &visible_row_ys, floating_top_height);
        let left_visible = first_past(&visible_columns, &visible_column_xs, floating_left_width);
        let bottom_visible = if last_top > 0 {
            last_within(
                &visible_rows,
                &visible_row_ys,
                &visible_row_heights,
                height - grid_y - theme.scroll_bar_size - floating_bottom_height,
            )
        } else {
            bottom
        };
        let right_visible = if last_left > 0 {
            last_within(
                &visible_columns,
                &visible_column_xs,
                &visible_column_widths,
                width - grid_x - theme.scroll_bar_size - floating_right_width,
            )
        } else {
            right
        };

        let user_column_widths = snapshot(&self.user_column_widths, model_columns.values());
        let user_row_heights = snapshot(&self.user_row_heights, model_rows.values());
        let calculated_column_widths =
            snapshot(&self.calculated_column_widths, model_columns.values());
        let calculated_row_heights = snapshot(&self.calculated_row_heights, model_rows.values());

        GridMetrics {
            row_height: theme.row_height,
            row_header_width: theme.row_header_width,
            row_footer_width: theme.row_footer_width,
            row_count,
            column_width: theme.column_width,
            column_count,
            column_header_height: theme.column_header_height,

            floating_top_row_count,
            floating_bottom_row_count,
            floating_left_column_count,
            floating_right_column_count,

            grid_x,
            grid_y,

            first_row,
            first_column,

            tree_padding_x,
            tree_padding_y,

            left,
            top,
            bottom,
            right,
            left_offset,
            top_offset,

            top_visible,
            left_visible,
            bottom_visible,
            right_visible,

            bottom_viewport,
            right_viewport,

            width,
            height,

            max_x,
            max_y,

            last_left,
            last_top,

            bar_width,
            bar_height,
            bar_left,
            bar_top,
            handle_width,
            handle_height,
            has_horizontal_bar,
            has_vertical_bar,
            vertical_bar_width,
            horizontal_bar_height,

            scroll_x,
            scroll_y,

            scrollable_content_width,
            scrollable_content_height,
            scrollable_viewport_width,
            scrollable_viewport_height,

            visible_rows,
            visible_columns,
            floating_rows,
            floating_columns,
            all_rows,
            all_columns,

            visible_row_heights,
            visible_column_widths,

            floating_top_height,
            floating_bottom_height,
            floating_left_width,
            floating_right_width,

            visible_row_ys,
            visible_column_xs,

            visible_row_tree_boxes,

            model_rows,
            model_columns,

            font_widths: self.font_widths.clone(),

            user_column_widths,
            user_row_heights,

            calculated_column_widths,
            calculated_row_heights,

            column_header_max_depth,
        }
    }

    /// The first row that is not hidden by a zero user height.
    pub fn first_row(&mut self, state: &GridMetricState<'_>) -> VisibleIndex {
        // Only the hidden items plus one more ever need checking.
        let max = self.user_row_heights.len() + 1;
        for row in 0..max {
            let model_row = self.model_row(row, state);
            if self.user_row_heights.get(model_row) != Some(0.0) {
                return row;
            }
        }
        0
    }

    /// The first column that is not hidden by a zero user width.
    pub fn first_column(&mut self, state: &GridMetricState<'_>) -> VisibleIndex {
        let max = self.user_column_widths.len() + 1;
        for column in 0..max {
            let model_column = self.model_column(column, state);
            if self.user_column_widths.get(model_column) != Some(0.0) {
                return column;
            }
        }
        0
    }

    /// Width available for scrollable columns, excluding floating regions.
    pub fn visible_width(&mut self, state: &mut GridMetricState<'_>) -> f64 {
        let theme = state.theme;
        let first_column = self.first_column(state);
        let tree_padding_x = self.calculate_tree_padding_x(state);
        let widths = self.floating_column_widths(state, first_column, tree_padding_x);
        let column_count = state.model.column_count();
        let floating_left =
            floating_start_total(&widths, state.model.floating_left_column_count());
        let floating_right = floating_end_total(
            &widths,
            state.model.floating_right_column_count(),
            column_count,
        );
        state.width
            - floating_left
            - floating_right
            - grid_x(state)
            - theme.scroll_bar_size
            - theme.row_footer_width
    }

    /// Height available for scrollable rows, excluding floating regions.
    pub fn visible_height(&mut self, state: &mut GridMetricState<'_>) -> f64 {
        let theme = state.theme;
        let heights = self.floating_row_heights(state);
        let row_count = state.model.row_count();
        let floating_top = floating_start_total(&heights, state.model.floating_top_row_count());
        let floating_bottom =
            floating_end_total(&heights, state.model.floating_bottom_row_count(), row_count);
        state.height - floating_bottom - floating_top - grid_y(state) - theme.scroll_bar_size
    }

    /// The last column that can be scrolled to the left edge, so the grid
    /// never scrolls past its content. Pass `right` to instead find the
    /// left column that keeps `right` fully visible.
    pub fn last_left(
        &mut self,
        state: &mut GridMetricState<'_>,
        right: Option<VisibleIndex>,
        visible_width: f64,
    ) -> VisibleIndex {
        let column_count = state.model.column_count();
        if column_count == 0 {
            return 0;
        }
        let first_column = self.first_column(state);
        let tree_padding_x = self.calculate_tree_padding_x(state);

        let mut column = right.unwrap_or(column_count - 1);
        let mut x = 0.0;
        loop {
            x += self.visible_column_width(column, state, first_column, tree_padding_x);
            if x >= visible_width {
                return (column + 1).min(column_count - 1);
            }
            if column == 0 {
                return 0;
            }
            column -= 1;
        }
    }

    /// The last row that can be scrolled to the top edge. Pass `bottom` to
    /// instead find the top row that keeps `bottom` fully visible.
    pub fn last_top(
        &mut self,
        state: &mut GridMetricState<'_>,
        bottom: Option<VisibleIndex>,
        visible_height: f64,
    ) -> VisibleIndex {
        let row_count = state.model.row_count();
        let floating_bottom = state.model.floating_bottom_row_count();

        let mut row = bottom.unwrap_or_else(|| row_count.saturating_sub(floating_bottom + 1));
        let mut y = 0.0;
        while row > 0 {
            y += self.visible_row_height(row, state);
            if y >= visible_height {
                return (row + 1).min(row_count.saturating_sub(1));
            }
            row -= 1;
        }
        0
    }

    /// The top row to scroll to so `top_visible` clears the floating top
    /// rows. With no floating rows the two are the same.
    pub fn top_for_top_visible(
        &mut self,
        state: &mut GridMetricState<'_>,
        top_visible: VisibleIndex,
    ) -> VisibleIndex {
        let heights = self.floating_row_heights(state);
        let floating_top_height =
            floating_start_total(&heights, state.model.floating_top_row_count());
        let mut top = top_visible;
        let mut y = 0.0;
        while top > 0 && y < floating_top_height {
            top -= 1;
            y += self.visible_row_height(top, state);
        }
        top
    }

    /// The top row to scroll to so `bottom_visible` sits fully visible at
    /// the bottom of the viewport.
    pub fn top_for_bottom_visible(
        &mut self,
        state: &mut GridMetricState<'_>,
        bottom_visible: VisibleIndex,
    ) -> VisibleIndex {
        let heights = self.floating_row_heights(state);
        let floating_bottom_height = floating_end_total(
            &heights,
            state.model.floating_bottom_row_count(),
            state.model.row_count(),
        );
        let available = state.height - grid_y(state) - floating_bottom_height;
        self.last_top(state, Some(bottom_visible), available)
    }

    /// The left column to scroll to so `left_visible` clears the floating
    /// left columns.
    pub fn left_for_left_visible(
        &mut self,
        state: &mut GridMetricState<'_>,
        left_visible: VisibleIndex,
    ) -> VisibleIndex {
        let first_column = self.first_column(state);
        let tree_padding_x = self.calculate_tree_padding_x(state);
        let widths = self.floating_column_widths(state, first_column, tree_padding_x);
        let floating_left_width =
            floating_start_total(&widths, state.model.floating_left_column_count());
        let mut left = left_visible;
        let mut x = 0.0;
        while left > 0 && x < floating_left_width {
            left -= 1;
            x += self.visible_column_width(left, state, first_column, tree_padding_x);
        }
        left
    }

    /// The left column to scroll to so `right_visible` sits fully visible
    /// at the right of the viewport.
    pub fn left_for_right_visible(
        &mut self,
        state: &mut GridMetricState<'_>,
        right_visible: VisibleIndex,
    ) -> VisibleIndex {
        let first_column = self.first_column(state);
        let tree_padding_x = self.calculate_tree_padding_x(state);
        let widths = self.floating_column_widths(state, first_column, tree_padding_x);
        let floating_right_width = floating_end_total(
            &widths,
            state.model.floating_right_column_count(),
            state.model.column_count(),
        );
        let available = state.width - grid_x(state) - floating_right_width;
        self.last_left(state, Some(right_visible), available)
    }

    /// Height of a row: the user override when set, the content-derived
    /// height otherwise. The derivation always runs so the calculated cache
    /// stays populated under an override.
    pub fn visible_row_height(
        &mut self,
        row: VisibleIndex,
        state: &mut GridMetricState<'_>,
    ) -> f64 {
        let model_row = self.model_row(row, state);
        let calculated = self.calculate_row_height(model_row, state);
        self.user_row_heights.get(model_row).unwrap_or(calculated)
    }

    /// Width of a column: the user override when set, the content-derived
    /// width otherwise.
    pub fn visible_column_width(
        &mut self,
        column: VisibleIndex,
        state: &mut GridMetricState<'_>,
        first_column: VisibleIndex,
        tree_padding_x: f64,
    ) -> f64 {
        let model_column = self.model_column(column, state);
        let calculated =
            self.calculate_column_width(column, model_column, state, first_column, tree_padding_x);
        self.user_column_widths
            .get(model_column)
            .unwrap_or(calculated)
    }

    /// Model index of a visible row, memoized until the row reorder list
    /// changes.
    pub fn model_row(&mut self, visible_row: VisibleIndex, state: &GridMetricState<'_>) -> ModelIndex {
        if let Some(&model_row) = self.model_rows.get(&visible_row) {
            return model_row;
        }
        let model_row = state.moved_rows.model_index(visible_row);
        self.model_rows.insert(visible_row, model_row);
        model_row
    }

    /// Model index of a visible column, memoized until the column reorder
    /// list changes.
    pub fn model_column(
        &mut self,
        visible_column: VisibleIndex,
        state: &GridMetricState<'_>,
    ) -> ModelIndex {
        if let Some(&model_column) = self.model_columns.get(&visible_column) {
            return model_column;
        }
        let model_column = state.moved_columns.model_index(visible_column);
        self.model_columns.insert(visible_column, model_column);
        model_column
    }

    /// Set a user width override for a column, rounded up to a whole pixel.
    pub fn set_column_width(&mut self, column: ModelIndex, size: f64) {
        self.user_column_widths.insert(column, size.ceil());
        self.user_column_widths.trim(CACHE_SIZE);
    }

    /// Clear a column's user width so the calculated width shows again.
    pub fn reset_column_width(&mut self, column: ModelIndex) {
        self.user_column_widths.remove(column);
    }

    /// Set a user height override for a row, rounded up to a whole pixel.
    pub fn set_row_height(&mut self, row: ModelIndex, size: f64) {
        self.user_row_heights.insert(row, size.ceil());
        self.user_row_heights.trim(CACHE_SIZE);
    }

    /// Clear a row's user height, along with its calculated height so the
    /// next pass re-derives it.
    pub fn reset_row_height(&mut self, row: ModelIndex) {
        self.user_row_heights.remove(row);
        self.calculated_row_heights.remove(row);
    }

    #[must_use]
    pub fn user_column_width(&self, column: ModelIndex) -> Option<f64> {
        self.user_column_widths.get(column)
    }

    #[must_use]
    pub fn user_row_height(&self, row: ModelIndex) -> Option<f64> {
        self.user_row_heights.get(row)
    }

    #[must_use]
    pub fn calculated_column_width(&self, column: ModelIndex) -> Option<f64> {
        self.calculated_column_widths.get(column)
    }

    #[must_use]
    pub fn calculated_row_height(&self, row: ModelIndex) -> Option<f64> {
        self.calculated_row_heights.get(row)
    }

    /// A counter that advances whenever a user size override changes.
    /// Consumers compare it across passes to detect resize activity.
    #[must_use]
    pub fn sizing_generation(&self) -> u64 {
        self.user_column_widths.generation() + self.user_row_heights.generation()
    }

    /// Indent reserved on the first column for tree expand boxes, sized to
    /// the deepest row near the viewport. Zero for non-tree models.
    fn calculate_tree_padding_x(&mut self, state: &GridMetricState<'_>) -> f64 {
        let Some(expandable) = state.model.expandable() else {
            return 0.0;
        };
        if !expandable.has_expandable_rows() {
            return 0.0;
        }
        let theme = state.theme;
        let rows_per_page = state.height / theme.row_height;
        let bottom = state.top + rows_per_page.ceil() as usize;

        let mut tree_padding: f64 = 0.0;
        for row in state.top..=bottom {
            let model_row = self.model_row(row, state);
            let depth = expandable.depth_for_row(model_row);
            tree_padding = tree_padding.max(theme.tree_depth_indent * (depth + 1) as f64);
        }
        tree_padding
    }

    /// Walk rows from the viewport top until the canvas is covered.
    fn visible_row_heights(
        &mut self,
        state: &mut GridMetricState<'_>,
    ) -> (Vec<VisibleIndex>, SizeMap) {
        let row_count = state.model.row_count();
        let mut rows = Vec::new();
        let mut heights = SizeMap::new();
        let mut y = 0.0;
        let mut row = state.top;
        while y < state.height + state.top_offset && row < row_count {
            let row_height = self.visible_row_height(row, state);
            heights.insert(row, row_height);
            rows.push(row);
            y += row_height;
            row += 1;
        }
        (rows, heights)
    }

    /// Walk columns from the viewport left until the canvas is covered.
    fn visible_column_widths(
        &mut self,
        state: &mut GridMetricState<'_>,
        first_column: VisibleIndex,
        tree_padding_x: f64,
    ) -> (Vec<VisibleIndex>, SizeMap) {
        let column_count = state.model.column_count();
        let mut columns = Vec::new();
        let mut widths = SizeMap::new();
        let mut x = 0.0;
        let mut column = state.left;
        while x < state.width + state.left_offset && column < column_count {
            let column_width =
                self.visible_column_width(column, state, first_column, tree_padding_x);
            widths.insert(column, column_width);
            columns.push(column);
            x += column_width;
            column += 1;
        }
        (columns, widths)
    }

    fn floating_row_heights(&mut self, state: &mut GridMetricState<'_>) -> SizeMap {
        let row_count = state.model.row_count();
        let floating_top = state.model.floating_top_row_count();
        let floating_bottom = state.model.floating_bottom_row_count();
        let mut heights = SizeMap::new();
        for row in index::floating_indices(floating_top, floating_bottom, row_count) {
            let row_height = self.visible_row_height(row, state);
            heights.insert(row, row_height);
        }
        heights
    }

    fn floating_column_widths(
        &mut self,
        state: &mut GridMetricState<'_>,
        first_column: VisibleIndex,
        tree_padding_x: f64,
    ) -> SizeMap {
        let column_count = state.model.column_count();
        let floating_left = state.model.floating_left_column_count();
        let floating_right = state.model.floating_right_column_count();
        let mut widths = SizeMap::new();
        for column in index::floating_indices(floating_left, floating_right, column_count) {
            let column_width =
                self.visible_column_width(column, state, first_column, tree_padding_x);
            widths.insert(column, column_width);
        }
        widths
    }

    fn model_rows_for(
        &mut self,
        visible_rows: &[VisibleIndex],
        state: &GridMetricState<'_>,
    ) -> VisibleToModelMap {
        visible_rows
            .iter()
            .map(|&row| (row, self.model_row(row, state)))
            .collect()
    }

    fn model_columns_for(
        &mut self,
        visible_columns: &[VisibleIndex],
        state: &GridMetricState<'_>,
    ) -> VisibleToModelMap {
        visible_columns
            .iter()
            .map(|&column| (column, self.model_column(column, state)))
            .collect()
    }

    /// Content-derived height of a row.
    ///
    /// There is no reliable way to measure wrapped text height yet, so this
    /// returns the theme height; it still populates the calculated cache so
    /// auto-size consumers see an entry.
    fn calculate_row_height(&mut self, model_row: ModelIndex, state: &GridMetricState<'_>) -> f64 {
        let theme = state.theme;
        if !theme.auto_size_rows {
            return theme.row_height;
        }
        if let Some(cached) = self.calculated_row_heights.get(model_row) {
            return cached;
        }
        self.calculated_row_heights
            .insert(model_row, theme.row_height.ceil());
        self.calculated_row_heights.trim(CACHE_SIZE);
        theme.row_height
    }

    /// Content-derived width of a column, from the wider of its header and
    /// visible data, clamped to the theme minimum. A cached wider value
    /// wins so widths only grow while scrolling.
    fn calculate_column_width(
        &mut self,
        column: VisibleIndex,
        model_column: ModelIndex,
        state: &mut GridMetricState<'_>,
        first_column: VisibleIndex,
        tree_padding_x: f64,
    ) -> f64 {
        let theme = state.theme;
        if !theme.auto_size_columns {
            return theme.column_width;
        }

        let header_width = self.calculate_column_header_width(model_column, state);
        let data_width = self.calculate_column_data_width(model_column, state);
        let mut column_width = header_width.max(data_width).ceil();
        column_width = column_width.max(theme.min_column_width);
        match self.calculated_column_widths.get(model_column) {
            Some(cached) if cached > column_width => column_width = cached,
            _ => {
                self.calculated_column_widths.insert(model_column, column_width);
                self.calculated_column_widths.trim(CACHE_SIZE);
            }
        }

        if column == first_column {
            column_width += tree_padding_x;
        }

        column_width
    }

    fn calculate_column_header_width(
        &mut self,
        model_column: ModelIndex,
        state: &mut GridMetricState<'_>,
    ) -> f64 {
        let theme = state.theme;
        let padding = theme.header_horizontal_padding * 2.0;
        match state.model.text_for_column_header(model_column, 0) {
            Some(text) if !text.is_empty() => {
                let font_width = self.width_for_font(&theme.header_font, state);
                text.chars().count() as f64 * font_width + padding
            }
            _ => padding,
        }
    }

    fn calculate_column_data_width(
        &mut self,
        model_column: ModelIndex,
        state: &mut GridMetricState<'_>,
    ) -> f64 {
        let theme = state.theme;
        let model = state.model;
        let row_count = model.row_count();
        let floating_top = model.floating_top_row_count();
        let floating_bottom = model.floating_bottom_row_count();
        let cell_padding = theme.cell_horizontal_padding * 2.0;

        let font_width = self.width_for_font(&theme.font, state);
        let rows_per_page = state.height / theme.row_height;
        let bottom = state.top + rows_per_page.ceil() as usize;

        let mut column_width: f64 = 0.0;
        for row in index::all_indices(state.top, bottom, floating_top, floating_bottom, row_count) {
            let model_row = self.model_row(row, state);
            if let Some(text) = model.text_for_cell(model_column, model_row)
                && !text.is_empty()
            {
                column_width =
                    column_width.max(text.chars().count() as f64 * font_width + cell_padding);
            }
        }

        let max_width = (state.width
            - theme.row_header_width
            - theme.scroll_bar_size
            - theme.row_footer_width)
            * MAX_COLUMN_WIDTH;
        column_width.min(max_width).max(cell_padding)
    }

    /// Estimated single-character width for `font`, measured once.
    ///
    /// Fonts use tabular figures so every character is the same width; the
    /// width of `8` stands in for all of them. The result is keyed under
    /// both the requested string and the backend-normalized one.
    fn width_for_font(&mut self, font: &str, state: &mut GridMetricState<'_>) -> f64 {
        if let Some(&width) = self.font_widths.get(font) {
            return width;
        }
        state.context.set_font(font);
        let width = state.context.measure_text("8");
        self.font_widths.insert(font.to_string(), width);
        self.font_widths
            .insert(state.context.font().to_string(), width);
        width
    }
}

/// x of the left side of the first cell; row headers sit before it.
#[must_use]
pub fn grid_x(state: &GridMetricState<'_>) -> f64 {
    state.theme.row_header_width
}

/// y of the top side of the first cell; column headers stack above it.
#[must_use]
pub fn grid_y(state: &GridMetricState<'_>) -> f64 {
    state.model.column_header_max_depth() as f64 * state.theme.column_header_height
}

/// Coordinates of `items` in order, starting at `-offset`.
fn coordinates_for(sizes: &SizeMap, items: &[VisibleIndex], offset: f64) -> CoordinateMap {
    let mut coordinates = CoordinateMap::new();
    let mut position = -offset;
    for &item in items {
        coordinates.insert(item, position);
        position += must_get(sizes, item);
    }
    coordinates
}

/// Coordinates of floating items: the start group packed from 0, the end
/// group packed backward from `max`.
fn floating_coordinates(
    start_count: usize,
    end_count: usize,
    total: usize,
    max: f64,
    sizes: &SizeMap,
) -> CoordinateMap {
    let mut coordinates = CoordinateMap::new();
    let mut position = 0.0;
    for item in 0..start_count.min(total) {
        coordinates.insert(item, position);
        position += must_get(sizes, item);
    }

    position = max;
    for i in 0..end_count {
        let Some(item) = total.checked_sub(i + 1) else {
            break;
        };
        position -= must_get(sizes, item);
        coordinates.insert(item, position);
    }
    coordinates
}

fn floating_start_total(sizes: &SizeMap, start_count: usize) -> f64 {
    (0..start_count).map(|item| must_get(sizes, item)).sum()
}

fn floating_end_total(sizes: &SizeMap, end_count: usize, total: usize) -> f64 {
    (0..end_count)
        .filter_map(|i| total.checked_sub(i + 1))
        .map(|item| must_get(sizes, item))
        .sum()
}

/// First item whose coordinate clears the floating region at the start.
fn first_past(items: &[VisibleIndex], coordinates: &CoordinateMap, floating_size: f64) -> VisibleIndex {
    items
        .iter()
        .copied()
        .find(|&item| must_get(coordinates, item) >= floating_size)
        .unwrap_or(0)
}

/// Last item that fits entirely within `visible_size`.
fn last_within(
    items: &[VisibleIndex],
    coordinates: &CoordinateMap,
    sizes: &SizeMap,
    visible_size: f64,
) -> VisibleIndex {
    items
        .iter()
        .rev()
        .copied()
        .find(|&item| must_get(coordinates, item) + must_get(sizes, item) <= visible_size)
        .unwrap_or(0)
}

/// The furthest index the viewport could show, padding past the end of the
/// data with default-sized items when the canvas is larger than the data.
fn last_index_viewport(
    items: &[VisibleIndex],
    coordinates: &CoordinateMap,
    sizes: &SizeMap,
    max_size: f64,
    default_item_size: f64,
) -> VisibleIndex {
    let mut last_index = 0;
    let mut data_size = 0.0;
    if let Some(&last) = items.last() {
        last_index = last;
        data_size = must_get(coordinates, last) + must_get(sizes, last);
    }
    if data_size < max_size {
        last_index += ((max_size - data_size) / default_item_size).ceil() as usize;
    }
    last_index
}

fn tree_boxes_for(
    visible_row_heights: &SizeMap,
    model_rows: &VisibleToModelMap,
    model: &dyn GridModel,
    theme: &GridTheme,
) -> HashMap<VisibleIndex, dgrid_core::geometry::BoxCoordinates> {
    let mut boxes = HashMap::new();
    let Some(expandable) = model.expandable() else {
        return boxes;
    };
    if !expandable.has_expandable_rows() {
        return boxes;
    }
    for (&row, &row_height) in visible_row_heights {
        let model_row = must_get(model_rows, row);
        if expandable.is_row_expandable(model_row) {
            let depth = expandable.depth_for_row(model_row) as f64;
            boxes.insert(
                row,
                dgrid_core::geometry::BoxCoordinates {
                    x1: depth * theme.tree_depth_indent + theme.tree_horizontal_padding,
                    y1: 0.0,
                    x2: (depth + 1.0) * theme.tree_depth_indent + theme.tree_horizontal_padding,
                    y2: row_height,
                },
            );
        }
    }
    boxes
}

/// Restrict a persistent model-indexed cache to this frame's indexes.
fn snapshot<'a>(
    cache: &SizeCache,
    model_indexes: impl Iterator<Item = &'a ModelIndex>,
) -> ModelSizeMap {
    model_indexes
        .filter_map(|&model_index| cache.get(model_index).map(|size| (model_index, size)))
        .collect()
}

/// Clamp with the lower bound winning when the bounds cross, so a minimum
/// handle size beats a degenerate bar.
fn clamp(value: f64, lower: f64, upper: f64) -> f64 {
    value.min(upper).max(lower)
}

fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
