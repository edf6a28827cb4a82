//! Row separator bindings and hit-testing.

use dgrid_core::geometry::GridPoint;
use dgrid_core::index::{ModelIndex, VisibleIndex};
use dgrid_core::theme::GridTheme;
use dgrid_metrics::GridMetricCalculator;
use dgrid_metrics::metrics::{CoordinateMap, GridMetrics, ModelSizeMap, SizeMap, VisibleToModelMap};

use crate::separator::{GridSeparator, SeparatorAxis, SeparatorDragHandler, find_separator};

/// Drag handler for row separators.
pub type RowSeparatorHandler = SeparatorDragHandler<RowAxis>;

#[derive(Debug, Clone, Copy)]
pub struct RowAxis;

impl SeparatorAxis for RowAxis {
    const DEFAULT_CURSOR: &'static str = "row-resize";
    const HIDDEN_CURSOR: &'static str = "s-resize";

    fn point_of(point: GridPoint) -> f64 {
        point.y
    }

    fn margin(metrics: &GridMetrics) -> f64 {
        metrics.column_header_height
    }

    fn visible_offsets(metrics: &GridMetrics) -> &CoordinateMap {
        &metrics.visible_row_ys
    }

    fn visible_sizes(metrics: &GridMetrics) -> &SizeMap {
        &metrics.visible_row_heights
    }

    fn user_sizes(metrics: &GridMetrics) -> &ModelSizeMap {
        &metrics.user_row_heights
    }

    fn calculated_sizes(metrics: &GridMetrics) -> &ModelSizeMap {
        &metrics.calculated_row_heights
    }

    fn model_indexes(metrics: &GridMetrics) -> &VisibleToModelMap {
        &metrics.model_rows
    }

    fn first_index(metrics: &GridMetrics) -> VisibleIndex {
        metrics.first_row
    }

    fn tree_padding(metrics: &GridMetrics) -> f64 {
        metrics.tree_padding_y
    }

    fn hidden_items(index: VisibleIndex, metrics: &GridMetrics) -> Vec<VisibleIndex> {
        metrics.hidden_rows(index)
    }

    fn next_shown_item(index: VisibleIndex, metrics: &GridMetrics) -> Option<VisibleIndex> {
        metrics.next_shown_row(index)
    }

    fn set_size(calculator: &mut GridMetricCalculator, model_index: ModelIndex, size: f64) {
        calculator.set_row_height(model_index, size);
    }

    fn reset_size(calculator: &mut GridMetricCalculator, model_index: ModelIndex) {
        calculator.reset_row_height(model_index);
    }

    /// Hit-test within the row header column.
    fn separator_at(
        point: GridPoint,
        metrics: &GridMetrics,
        theme: &GridTheme,
    ) -> Option<GridSeparator> {
        if point.x > metrics.row_header_width
            || !theme.allow_row_resize
            || theme.header_separator_handle_size <= 0.0
        {
            return None;
        }

        let grid_y = point.y - metrics.column_header_height;
        let half_handle = theme.header_separator_handle_size * 0.5;

        let index = find_separator(
            &metrics.visible_rows,
            &metrics.visible_row_ys,
            &metrics.visible_row_heights,
            grid_y,
            half_handle,
            f64::NEG_INFINITY,
        )?;

        Some(GridSeparator { index, depth: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_with_rows(heights: &[f64]) -> GridMetrics {
        let mut metrics = GridMetrics {
            row_count: heights.len(),
            row_header_width: 30.0,
            column_header_height: 20.0,
            grid_y: 20.0,
            ..GridMetrics::default()
        };
        let mut y = 0.0;
        for (row, &height) in heights.iter().enumerate() {
            metrics.visible_rows.push(row);
            metrics.visible_row_heights.insert(row, height);
            metrics.visible_row_ys.insert(row, y);
            metrics.model_rows.insert(row, row);
            y += height;
        }
        metrics
    }

    fn separator_at(x: f64, y: f64, metrics: &GridMetrics, theme: &GridTheme) -> Option<usize> {
        RowAxis::separator_at(GridPoint::new(x, y), metrics, theme)
            .map(|separator| separator.index)
    }

    #[test]
    fn hit_within_handle_of_boundary() {
        let metrics = metrics_with_rows(&[20.0, 20.0, 20.0]);
        let theme = GridTheme::default();

        // Row 0's boundary sits at canvas y 40.
        assert_eq!(separator_at(10.0, 40.0, &metrics, &theme), Some(0));
        assert_eq!(separator_at(10.0, 42.0, &metrics, &theme), Some(0));
        assert_eq!(separator_at(10.0, 60.0, &metrics, &theme), Some(1));
        assert_eq!(separator_at(10.0, 50.0, &metrics, &theme), None);
    }

    #[test]
    fn miss_outside_row_header() {
        let metrics = metrics_with_rows(&[20.0, 20.0]);
        let theme = GridTheme::default();
        assert_eq!(separator_at(35.0, 40.0, &metrics, &theme), None);
    }

    #[test]
    fn respects_resize_toggle() {
        let metrics = metrics_with_rows(&[20.0, 20.0]);
        let theme = GridTheme {
            allow_row_resize: false,
            ..GridTheme::default()
        };
        assert_eq!(separator_at(10.0, 40.0, &metrics, &theme), None);
    }

    #[test]
    fn hidden_row_shares_boundary_with_neighbour() {
        let metrics = metrics_with_rows(&[20.0, 0.0, 20.0]);
        let theme = GridTheme::default();

        assert_eq!(separator_at(10.0, 41.5, &metrics, &theme), Some(1));
        assert_eq!(separator_at(10.0, 38.0, &metrics, &theme), Some(0));
    }
}
