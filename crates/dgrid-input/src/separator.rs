//! Drag-to-resize state machine for row and column separators.
//!
//! One algorithm serves both dimensions: [`SeparatorDragHandler`] is generic
//! over a [`SeparatorAxis`] that maps axis-neutral questions (pointer
//! coordinate, offset map, size mutators, hit test) onto either rows or
//! columns. The interesting part is dragging through hidden items: shrinking
//! an item to zero and continuing pulls the next item into the resize, and
//! dragging back the other way reveals hidden items one by one.

use std::collections::HashMap;
use std::marker::PhantomData;

use dgrid_core::geometry::GridPoint;
use dgrid_core::index::{ModelIndex, VisibleIndex};
use dgrid_core::theme::GridTheme;
use dgrid_metrics::GridMetricCalculator;
use dgrid_metrics::cache::{get_or, must_get};
use dgrid_metrics::metrics::{CoordinateMap, GridMetrics, ModelSizeMap, SizeMap, VisibleToModelMap};

/// The row/column boundary being dragged, with the header depth it was hit
/// at (only ever non-zero for grouped column headers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSeparator {
    pub index: VisibleIndex,
    pub depth: usize,
}

/// The grid surface a separator handler drives.
///
/// `metrics` returns `None` before the first layout pass; handlers treat
/// interaction before layout as an invariant violation and panic.
pub trait SeparatorHost {
    fn metrics(&self) -> Option<&GridMetrics>;
    fn theme(&self) -> &GridTheme;
    fn calculator_mut(&mut self) -> &mut GridMetricCalculator;

    /// Show or clear the separator highlight while a drag is active.
    fn set_separator(&mut self, separator: Option<GridSeparator>);

    /// Ask for a repaint after sizes changed outside a drag.
    fn request_redraw(&mut self);
}

/// Axis bindings for the shared separator algorithm, implemented once for
/// rows and once for columns.
pub trait SeparatorAxis {
    const DEFAULT_CURSOR: &'static str;
    const HIDDEN_CURSOR: &'static str;

    /// The pointer coordinate along this axis.
    fn point_of(point: GridPoint) -> f64;

    /// Header thickness before the first item (row header width for
    /// columns, column header height for rows).
    fn margin(metrics: &GridMetrics) -> f64;

    fn visible_offsets(metrics: &GridMetrics) -> &CoordinateMap;
    fn visible_sizes(metrics: &GridMetrics) -> &SizeMap;
    fn user_sizes(metrics: &GridMetrics) -> &ModelSizeMap;
    fn calculated_sizes(metrics: &GridMetrics) -> &ModelSizeMap;
    fn model_indexes(metrics: &GridMetrics) -> &VisibleToModelMap;
    fn first_index(metrics: &GridMetrics) -> VisibleIndex;
    fn tree_padding(metrics: &GridMetrics) -> f64;

    /// The run of hidden items collapsed under the separator at `index`.
    fn hidden_items(index: VisibleIndex, metrics: &GridMetrics) -> Vec<VisibleIndex>;

    /// The nearest earlier item that is not hidden.
    fn next_shown_item(index: VisibleIndex, metrics: &GridMetrics) -> Option<VisibleIndex>;

    fn set_size(calculator: &mut GridMetricCalculator, model_index: ModelIndex, size: f64);
    fn reset_size(calculator: &mut GridMetricCalculator, model_index: ModelIndex);

    /// Hit-test a separator under the pointer.
    fn separator_at(
        point: GridPoint,
        metrics: &GridMetrics,
        theme: &GridTheme,
    ) -> Option<GridSeparator>;
}

/// Pointer-driven resize state for one axis.
#[derive(Debug)]
pub struct SeparatorDragHandler<A: SeparatorAxis> {
    /// Where the drag started; `None` while idle.
    dragging_index: Option<VisibleIndex>,

    /// Items being resized together, in the order they joined the drag.
    resizing_items: Vec<VisibleIndex>,

    /// Items that were hidden under the separator when the drag started,
    /// in display order.
    hidden_items: Vec<VisibleIndex>,

    /// Size each item snaps back to when the drag retreats past it.
    target_sizes: HashMap<ModelIndex, f64>,

    /// Accumulated offset from items revealed mid-drag.
    drag_offset: f64,

    cursor: Option<&'static str>,

    _axis: PhantomData<A>,
}

impl<A: SeparatorAxis> Default for SeparatorDragHandler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: SeparatorAxis> SeparatorDragHandler<A> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dragging_index: None,
            resizing_items: Vec::new(),
            hidden_items: Vec::new(),
            target_sizes: HashMap::new(),
            drag_offset: 0.0,
            cursor: None,
            _axis: PhantomData,
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging_index.is_some()
    }

    /// The cursor hint from the last interaction, as a CSS cursor name.
    #[must_use]
    pub fn cursor(&self) -> Option<&'static str> {
        self.cursor
    }

    /// Begin a drag if a separator sits under the pointer.
    pub fn on_down(&mut self, point: GridPoint, host: &mut dyn SeparatorHost) -> bool {
        let metrics = host.metrics().expect("metrics not set");
        let Some(separator) = A::separator_at(point, metrics, host.theme()) else {
            return false;
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(index = separator.index, "separator drag start");

        self.drag_offset = 0.0;
        self.dragging_index = Some(separator.index);
        self.resizing_items = vec![separator.index];
        self.hidden_items = A::hidden_items(separator.index, metrics);
        self.hidden_items.reverse();
        self.target_sizes.clear();

        self.add_target_size(metrics, separator.index);
        self.update_cursor(metrics, separator.index);

        host.set_separator(Some(separator));
        true
    }

    /// Update the cursor hint while idle; never starts a drag.
    pub fn on_move(&mut self, point: GridPoint, host: &mut dyn SeparatorHost) -> bool {
        let metrics = host.metrics().expect("metrics not set");
        if let Some(separator) = A::separator_at(point, metrics, host.theme()) {
            self.update_cursor(metrics, separator.index);
            true
        } else {
            false
        }
    }

    /// Resize the dragged item, cascading through hidden neighbours when
    /// the pointer overshoots.
    pub fn on_drag(&mut self, point: GridPoint, host: &mut dyn SeparatorHost) -> bool {
        let Some(dragging_index) = self.dragging_index else {
            return false;
        };

        let target = A::point_of(point);
        let theme = host.theme();
        let snap_threshold = theme.header_resize_snap_threshold;
        let hidden_snap_threshold = theme.header_resize_hidden_snap_threshold;

        // Batched and applied after the loop so each step sees the sizes
        // the drag started from.
        let mut new_sizes: HashMap<ModelIndex, Option<f64>> = HashMap::new();

        {
            let metrics = host.metrics().expect("metrics not set");
            let visible_offsets = A::visible_offsets(metrics);
            let margin = A::margin(metrics);
            let calculated_sizes = A::calculated_sizes(metrics);
            let model_indexes = A::model_indexes(metrics);
            let first_index = A::first_index(metrics);
            let tree_padding = A::tree_padding(metrics);

            // A fast drag can cross several items in one event.
            let mut resize_index = self.resizing_items.last().copied();
            while let Some(index) = resize_index {
                let item_offset = must_get(visible_offsets, index);
                let item_size = target - margin - item_offset - self.drag_offset;
                let model_index = must_get(model_indexes, index);
                let target_size = self.target_sizes.get(&model_index).copied();
                let is_resizing_multiple = self.resizing_items.len() > 1;
                let hidden_index = self.hidden_items.iter().position(|&item| item == index);
                let mut calculated_size = must_get(calculated_sizes, model_index);
                if index == first_index {
                    calculated_size += tree_padding;
                }

                let mut new_size = Some(item_size);
                if (item_size - calculated_size).abs() <= snap_threshold {
                    // Snap back to the natural size, dropping the override.
                    new_size = None;
                } else if let Some(target_size) = target_size
                    && item_size > target_size
                    && ((is_resizing_multiple && hidden_index != Some(0))
                        || hidden_index.is_some_and(|i| i > 0))
                {
                    new_size = Some(target_size);
                } else if item_size <= hidden_snap_threshold {
                    // Snap to hidden.
                    new_size = Some(0.0);
                }

                if new_size == Some(calculated_size) {
                    new_sizes.insert(model_index, None);
                } else {
                    new_sizes.insert(model_index, new_size);
                }

                if item_size < -snap_threshold && new_size == Some(0.0) {
                    if hidden_index.is_some() && is_resizing_multiple {
                        // Retreating over an item revealed earlier this drag.
                        self.resizing_items.pop();
                        self.remove_target_size(metrics, index);
                        resize_index = self.resizing_items.last().copied();
                        if let Some(previous) = resize_index {
                            let previous_model = must_get(model_indexes, previous);
                            self.drag_offset -= self
                                .target_sizes
                                .get(&previous_model)
                                .copied()
                                .unwrap_or(0.0);
                        }
                    } else {
                        // Shrunk through zero, pull in the next shown item.
                        resize_index = A::next_shown_item(index, metrics);
                        if let Some(next) = resize_index {
                            self.resizing_items.push(next);
                            self.add_target_size(metrics, next);
                        }
                    }
                } else if let Some(target_size) = target_size
                    && item_size > target_size + snap_threshold
                    && new_size == Some(target_size)
                {
                    if let Some(hidden_position) = hidden_index.filter(|&i| i > 0) {
                        // Grew past a hidden item's boundary, reveal the
                        // one before it.
                        self.drag_offset += target_size;
                        let revealed = self.hidden_items[hidden_position - 1];
                        resize_index = Some(revealed);
                        self.resizing_items.push(revealed);
                        self.add_target_size(metrics, revealed);
                    } else if is_resizing_multiple {
                        self.resizing_items.pop();
                        self.remove_target_size(metrics, index);
                        resize_index = self.resizing_items.last().copied();
                    } else {
                        resize_index = None;
                    }
                } else {
                    resize_index = None;
                }
            }
        }

        let calculator = host.calculator_mut();
        for (&model_index, &new_size) in &new_sizes {
            match new_size {
                Some(size) => A::set_size(calculator, model_index, size),
                None => A::reset_size(calculator, model_index),
            }
        }

        let metrics = host.metrics().expect("metrics not set");
        self.update_cursor(metrics, dragging_index);
        true
    }

    /// End the drag. Never consumes the event.
    pub fn on_up(&mut self, _point: GridPoint, host: &mut dyn SeparatorHost) -> bool {
        if self.dragging_index.is_some() {
            self.dragging_index = None;
            self.resizing_items.clear();
            self.hidden_items.clear();
            self.target_sizes.clear();

            host.set_separator(None);
        }
        false
    }

    /// Autofit the item at the separator: set its size to the calculated
    /// one, or drop the override when it already matches.
    pub fn on_double_click(&mut self, point: GridPoint, host: &mut dyn SeparatorHost) -> bool {
        let metrics = host.metrics().expect("metrics not set");
        let Some(separator) = A::separator_at(point, metrics, host.theme()) else {
            return false;
        };

        let model_index = must_get(A::model_indexes(metrics), separator.index);
        let calculated_size = must_get(A::calculated_sizes(metrics), model_index);
        let user_size = A::user_sizes(metrics).get(&model_index).copied();

        let calculator = host.calculator_mut();
        match user_size {
            Some(user_size) if user_size != calculated_size => {
                A::set_size(calculator, model_index, calculated_size);
            }
            _ => A::reset_size(calculator, model_index),
        }

        host.request_redraw();
        true
    }

    fn update_cursor(&mut self, metrics: &GridMetrics, index: VisibleIndex) {
        let item_size = must_get(A::visible_sizes(metrics), index);
        self.cursor = if item_size == 0.0 {
            Some(A::HIDDEN_CURSOR)
        } else {
            Some(A::DEFAULT_CURSOR)
        };
    }

    /// Remember the size `index` snaps back to: the user size when set and
    /// non-zero, else the calculated size (plus tree padding on item 0).
    fn add_target_size(&mut self, metrics: &GridMetrics, index: VisibleIndex) {
        let tree_padding = if index == 0 {
            A::tree_padding(metrics)
        } else {
            0.0
        };
        let model_index = must_get(A::model_indexes(metrics), index);
        let target_size = match A::user_sizes(metrics).get(&model_index).copied() {
            Some(size) if size != 0.0 => size,
            _ => must_get(A::calculated_sizes(metrics), model_index) + tree_padding,
        };
        self.target_sizes.insert(model_index, target_size);
    }

    fn remove_target_size(&mut self, metrics: &GridMetrics, index: VisibleIndex) {
        let model_index = must_get(A::model_indexes(metrics), index);
        self.target_sizes.remove(&model_index);
    }
}

/// Scan items back-to-front for a separator within half a handle of the
/// pointer. Hidden items share a separator with their shown neighbour, so
/// the hit band is nudged by half the handle to keep both reachable. Items
/// starting under the floating layer at the axis start are unreachable.
pub(crate) fn find_separator(
    items: &[VisibleIndex],
    coordinates: &CoordinateMap,
    sizes: &SizeMap,
    target: f64,
    half_handle: f64,
    occlusion: f64,
) -> Option<VisibleIndex> {
    let mut previous_hidden = false;
    for &item in items.iter().rev() {
        let position = get_or(coordinates, item, 0.0);
        let size = get_or(sizes, item, 0.0);
        let hidden = size == 0.0;

        if position < occlusion - size {
            return None;
        }
        if previous_hidden && hidden {
            continue;
        }

        let mut mid = position + size;
        if hidden {
            mid += half_handle;
        } else if previous_hidden {
            mid -= half_handle;
        }
        if mid - half_handle <= target && target <= mid + half_handle {
            return Some(item);
        }
        previous_hidden = hidden;
    }
    None
}
