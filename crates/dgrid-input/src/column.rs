//! Column separator bindings and hit-testing.

use dgrid_core::geometry::GridPoint;
use dgrid_core::index::{ModelIndex, VisibleIndex};
use dgrid_core::theme::GridTheme;
use dgrid_metrics::GridMetricCalculator;
use dgrid_metrics::metrics::{CoordinateMap, GridMetrics, ModelSizeMap, SizeMap, VisibleToModelMap};

use crate::separator::{GridSeparator, SeparatorAxis, SeparatorDragHandler, find_separator};

/// Drag handler for column separators.
pub type ColumnSeparatorHandler = SeparatorDragHandler<ColumnAxis>;

#[derive(Debug, Clone, Copy)]
pub struct ColumnAxis;

impl SeparatorAxis for ColumnAxis {
    const DEFAULT_CURSOR: &'static str = "col-resize";
    const HIDDEN_CURSOR: &'static str = "e-resize";

    fn point_of(point: GridPoint) -> f64 {
        point.x
    }

    fn margin(metrics: &GridMetrics) -> f64 {
        metrics.row_header_width
    }

    fn visible_offsets(metrics: &GridMetrics) -> &CoordinateMap {
        &metrics.visible_column_xs
    }

    fn visible_sizes(metrics: &GridMetrics) -> &SizeMap {
        &metrics.visible_column_widths
    }

    fn user_sizes(metrics: &GridMetrics) -> &ModelSizeMap {
        &metrics.user_column_widths
    }

    fn calculated_sizes(metrics: &GridMetrics) -> &ModelSizeMap {
        &metrics.calculated_column_widths
    }

    fn model_indexes(metrics: &GridMetrics) -> &VisibleToModelMap {
        &metrics.model_columns
    }

    fn first_index(metrics: &GridMetrics) -> VisibleIndex {
        metrics.first_column
    }

    fn tree_padding(metrics: &GridMetrics) -> f64 {
        metrics.tree_padding_x
    }

    fn hidden_items(index: VisibleIndex, metrics: &GridMetrics) -> Vec<VisibleIndex> {
        metrics.hidden_columns(index)
    }

    fn next_shown_item(index: VisibleIndex, metrics: &GridMetrics) -> Option<VisibleIndex> {
        metrics.next_shown_column(index)
    }

    fn set_size(calculator: &mut GridMetricCalculator, model_index: ModelIndex, size: f64) {
        calculator.set_column_width(model_index, size);
    }

    fn reset_size(calculator: &mut GridMetricCalculator, model_index: ModelIndex) {
        calculator.reset_column_width(model_index);
    }

    /// Hit-test within the column header band. Floating columns are checked
    /// first since they render on top; a separator of a scrolled column
    /// hidden under the floating-left layer is unreachable.
    fn separator_at(
        point: GridPoint,
        metrics: &GridMetrics,
        theme: &GridTheme,
    ) -> Option<GridSeparator> {
        if point.y > metrics.grid_y
            || !theme.allow_column_resize
            || theme.header_separator_handle_size <= 0.0
        {
            return None;
        }

        let grid_x = point.x - metrics.row_header_width;
        let half_handle = theme.header_separator_handle_size * 0.5;

        let index = find_separator(
            &metrics.floating_columns,
            &metrics.visible_column_xs,
            &metrics.visible_column_widths,
            grid_x,
            half_handle,
            f64::NEG_INFINITY,
        )
        .or_else(|| {
            find_separator(
                &metrics.visible_columns,
                &metrics.visible_column_xs,
                &metrics.visible_column_widths,
                grid_x,
                half_handle,
                metrics.floating_left_width,
            )
        })?;

        Some(GridSeparator {
            index,
            depth: header_depth_at(point.y, metrics),
        })
    }
}

/// Header depth under the pointer, 0 at the innermost (bottom) header row.
fn header_depth_at(y: f64, metrics: &GridMetrics) -> usize {
    if metrics.column_header_height <= 0.0 || metrics.column_header_max_depth == 0 {
        return 0;
    }
    let depth = ((metrics.grid_y - y) / metrics.column_header_height) as usize;
    depth.min(metrics.column_header_max_depth - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_with_columns(widths: &[f64]) -> GridMetrics {
        let mut metrics = GridMetrics {
            column_count: widths.len(),
            row_header_width: 30.0,
            column_header_height: 20.0,
            grid_y: 20.0,
            column_header_max_depth: 1,
            ..GridMetrics::default()
        };
        let mut x = 0.0;
        for (column, &width) in widths.iter().enumerate() {
            metrics.visible_columns.push(column);
            metrics.visible_column_widths.insert(column, width);
            metrics.visible_column_xs.insert(column, x);
            metrics.model_columns.insert(column, column);
            x += width;
        }
        metrics
    }

    fn separator_at(x: f64, y: f64, metrics: &GridMetrics, theme: &GridTheme) -> Option<usize> {
        ColumnAxis::separator_at(GridPoint::new(x, y), metrics, theme)
            .map(|separator| separator.index)
    }

    #[test]
    fn hit_within_handle_of_boundary() {
        let metrics = metrics_with_columns(&[100.0, 100.0]);
        let theme = GridTheme::default();

        // Boundary of column 0 sits at canvas x 130.
        assert_eq!(separator_at(130.0, 10.0, &metrics, &theme), Some(0));
        assert_eq!(separator_at(132.0, 10.0, &metrics, &theme), Some(0));
        assert_eq!(separator_at(128.0, 10.0, &metrics, &theme), Some(0));
        assert_eq!(separator_at(230.0, 10.0, &metrics, &theme), Some(1));
        assert_eq!(separator_at(180.0, 10.0, &metrics, &theme), None);
    }

    #[test]
    fn miss_below_header_band() {
        let metrics = metrics_with_columns(&[100.0, 100.0]);
        let theme = GridTheme::default();
        assert_eq!(separator_at(130.0, 25.0, &metrics, &theme), None);
    }

    #[test]
    fn respects_resize_toggle() {
        let metrics = metrics_with_columns(&[100.0, 100.0]);
        let theme = GridTheme {
            allow_column_resize: false,
            ..GridTheme::default()
        };
        assert_eq!(separator_at(130.0, 10.0, &metrics, &theme), None);
    }

    #[test]
    fn hidden_column_shares_boundary_with_neighbour() {
        // Column 1 is hidden; both separators live around x 130.
        let metrics = metrics_with_columns(&[100.0, 0.0, 100.0]);
        let theme = GridTheme::default();

        // Just past the boundary belongs to the hidden column 1.
        assert_eq!(separator_at(131.5, 10.0, &metrics, &theme), Some(1));
        // Just before it still belongs to column 0.
        assert_eq!(separator_at(128.0, 10.0, &metrics, &theme), Some(0));
    }

    #[test]
    fn floating_layer_occludes_scrolled_separators() {
        let mut metrics = metrics_with_columns(&[100.0, 100.0, 100.0]);
        // Column 0 floats on the left while column 1 has scrolled mostly
        // underneath it, leaving its right edge at grid x 80.
        metrics.floating_columns = vec![0];
        metrics.floating_left_width = 100.0;
        metrics.visible_columns = vec![1, 2];
        metrics.visible_column_xs.insert(1, -20.0);
        metrics.visible_column_xs.insert(2, 80.0);
        let theme = GridTheme::default();

        // The floating column's own separator hits.
        assert_eq!(separator_at(130.0, 10.0, &metrics, &theme), Some(0));
        // Column 1's boundary at grid x 80 is behind the floating layer.
        assert_eq!(separator_at(110.0, 10.0, &metrics, &theme), None);
        // Column 2 is clear of the layer.
        assert_eq!(separator_at(210.0, 10.0, &metrics, &theme), Some(2));
    }

    #[test]
    fn depth_counts_header_rows_from_the_bottom() {
        let mut metrics = metrics_with_columns(&[100.0, 100.0]);
        metrics.column_header_max_depth = 3;
        metrics.grid_y = 60.0;
        let theme = GridTheme::default();

        let at = |y: f64| {
            ColumnAxis::separator_at(GridPoint::new(130.0, y), &metrics, &theme)
                .map(|separator| separator.depth)
        };
        assert_eq!(at(55.0), Some(0));
        assert_eq!(at(35.0), Some(1));
        assert_eq!(at(5.0), Some(2));
        assert_eq!(at(65.0), None);
    }
}
