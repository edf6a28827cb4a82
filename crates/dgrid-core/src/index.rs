//! Visible/model index translation under row and column reordering.
//!
//! The grid displays items in *visible* order; the underlying data is
//! addressed by *model* index. Reordering is recorded as a list of
//! [`MoveOperation`]s applied in sequence; translating a visible index back
//! to a model index unwinds that list from the end.

use std::sync::atomic::{AtomicU64, Ordering};

/// A grid row/column position as currently displayed.
pub type VisibleIndex = usize;

/// The underlying data row/column identity, independent of display order.
pub type ModelIndex = usize;

/// A single drag-reorder step: the item at visible index `from` was moved
/// to visible index `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOperation {
    pub from: VisibleIndex,
    pub to: VisibleIndex,
}

/// An identity token for a [`MoveOperations`] list.
///
/// Two tokens compare equal only when they come from the same list instance
/// at the same mutation count. Consumers cache translations keyed by the
/// token and recompute when it changes, including when a caller swaps in a
/// fresh list with equivalent contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveToken {
    id: u64,
    version: u64,
}

impl MoveToken {
    /// A token no live list can produce, for "nothing seen yet" defaults.
    pub const NONE: MoveToken = MoveToken { id: 0, version: 0 };
}

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(1);

/// An ordered list of reorder operations with an identity token.
#[derive(Debug)]
pub struct MoveOperations {
    id: u64,
    version: u64,
    ops: Vec<MoveOperation>,
}

impl Default for MoveOperations {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveOperations {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed),
            version: 1,
            ops: Vec::new(),
        }
    }

    /// Record a move of the item at visible index `from` to `to`.
    ///
    /// Consecutive drags of the same item are merged into one operation.
    /// A move where `from == to` is a no-op and does not change the token.
    pub fn move_item(&mut self, from: VisibleIndex, to: VisibleIndex) {
        if from == to {
            return;
        }
        if let Some(last) = self.ops.last_mut()
            && last.to == from
        {
            last.to = to;
        } else {
            self.ops.push(MoveOperation { from, to });
        }
        self.version += 1;
    }

    #[must_use]
    pub fn ops(&self) -> &[MoveOperation] {
        &self.ops
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The identity token for the current state of this list.
    #[must_use]
    pub fn token(&self) -> MoveToken {
        MoveToken {
            id: self.id,
            version: self.version,
        }
    }

    /// Translate a visible index to its model index.
    #[must_use]
    pub fn model_index(&self, visible_index: VisibleIndex) -> ModelIndex {
        model_index_for(visible_index, &self.ops)
    }

    /// Translate a model index to its visible index.
    #[must_use]
    pub fn visible_index(&self, model_index: ModelIndex) -> VisibleIndex {
        visible_index_for(model_index, &self.ops)
    }
}

/// Translate a visible index to a model index by unwinding `ops` from the
/// most recent operation backward.
#[must_use]
pub fn model_index_for(visible_index: VisibleIndex, ops: &[MoveOperation]) -> ModelIndex {
    let mut model_index = visible_index;
    for op in ops.iter().rev() {
        if model_index == op.to {
            model_index = op.from;
        } else if op.from <= model_index && model_index < op.to {
            model_index += 1;
        } else if op.to < model_index && model_index <= op.from {
            model_index -= 1;
        }
    }
    model_index
}

/// Translate a model index to its visible index by applying `ops` in order.
#[must_use]
pub fn visible_index_for(model_index: ModelIndex, ops: &[MoveOperation]) -> VisibleIndex {
    let mut visible_index = model_index;
    for op in ops {
        if visible_index == op.from {
            visible_index = op.to;
        } else if op.from < visible_index && visible_index <= op.to {
            visible_index -= 1;
        } else if op.to <= visible_index && visible_index < op.from {
            visible_index += 1;
        }
    }
    visible_index
}

/// Indices of floating items in one dimension: the start group walked
/// forward from 0, then the end group walked backward from `total - 1`.
pub fn floating_indices(
    start_count: usize,
    end_count: usize,
    total: usize,
) -> impl Iterator<Item = VisibleIndex> {
    let start = 0..start_count.min(total);
    let end = (0..end_count)
        .map_while(move |i| (total.checked_sub(i + 1)))
        .filter(move |&index| index >= start_count.min(total));
    start.chain(end)
}

/// All items in one dimension: floating items first, then the visible
/// viewport clamped to exclude the floating regions.
pub fn all_indices(
    visible_start: VisibleIndex,
    visible_end: VisibleIndex,
    floating_start_count: usize,
    floating_end_count: usize,
    total: usize,
) -> impl Iterator<Item = VisibleIndex> {
    let clamped_start = visible_start.max(floating_start_count);
    let clamped_end = visible_end.min(total.saturating_sub(floating_end_count + 1));
    let viewport = if clamped_start <= clamped_end && total > 0 {
        clamped_start..=clamped_end
    } else {
        // Empty range with the right item type.
        1..=0
    };
    floating_indices(floating_start_count, floating_end_count, total).chain(viewport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn expect_model_indexes(ops: &MoveOperations, expected: &[ModelIndex]) {
        for (visible, &model) in expected.iter().enumerate() {
            assert_eq!(ops.model_index(visible), model, "visible {visible}");
        }
    }

    fn expect_visible_indexes(ops: &MoveOperations, expected: &[VisibleIndex]) {
        for (model, &visible) in expected.iter().enumerate() {
            assert_eq!(ops.visible_index(model), visible, "model {model}");
        }
    }

    #[test]
    fn single_move_next_to_itself() {
        let mut ops = MoveOperations::new();
        ops.move_item(2, 1);
        expect_model_indexes(&ops, &[0, 2, 1, 3]);
        expect_visible_indexes(&ops, &[0, 2, 1, 3]);
    }

    #[test]
    fn single_move_across() {
        let mut ops = MoveOperations::new();
        ops.move_item(5, 2);
        expect_model_indexes(&ops, &[0, 1, 5, 2, 3, 4, 6, 7]);
        expect_visible_indexes(&ops, &[0, 1, 3, 4, 5, 2, 6, 7]);
    }

    #[test]
    fn two_moves() {
        let mut ops = MoveOperations::new();
        ops.move_item(5, 2);
        ops.move_item(7, 0);
        expect_model_indexes(&ops, &[7, 0, 1, 5, 2, 3, 4, 6]);
        expect_visible_indexes(&ops, &[1, 2, 4, 5, 6, 3, 7, 0]);
    }

    #[test]
    fn last_to_front_repeatedly() {
        let item_count = 3;
        let mut ops = MoveOperations::new();
        for i in 0..item_count {
            ops.move_item(item_count - 1, 0);
            for j in 0..item_count {
                assert_eq!(
                    ops.model_index(j),
                    (j + item_count - i - 1) % item_count,
                    "round {i} visible {j}"
                );
                assert_eq!(
                    ops.visible_index(j),
                    (j + i + 1) % item_count,
                    "round {i} model {j}"
                );
            }
        }
    }

    #[test]
    fn consecutive_drags_merge() {
        let mut ops = MoveOperations::new();
        ops.move_item(4, 5);
        ops.move_item(5, 6);
        assert_eq!(ops.ops(), &[MoveOperation { from: 4, to: 6 }]);
    }

    #[test]
    fn noop_move_keeps_token() {
        let mut ops = MoveOperations::new();
        let before = ops.token();
        ops.move_item(3, 3);
        assert_eq!(ops.token(), before);
        ops.move_item(3, 4);
        assert_ne!(ops.token(), before);
    }

    #[test]
    fn fresh_list_has_distinct_token() {
        let a = MoveOperations::new();
        let b = MoveOperations::new();
        assert_ne!(a.token(), b.token());
        assert_ne!(a.token(), MoveToken::NONE);
    }

    #[test]
    fn floating_indices_both_ends() {
        let indices: Vec<_> = floating_indices(2, 1, 10).collect();
        assert_eq!(indices, vec![0, 1, 9]);
    }

    #[test]
    fn floating_indices_more_than_total() {
        let indices: Vec<_> = floating_indices(5, 5, 3).collect();
        // Start group wins the overlap.
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn all_indices_floating_then_viewport() {
        let indices: Vec<_> = all_indices(1, 6, 2, 1, 10).collect();
        assert_eq!(indices, vec![0, 1, 9, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn all_indices_empty_viewport() {
        let indices: Vec<_> = all_indices(5, 3, 0, 0, 10).collect();
        assert!(indices.is_empty());
    }

    proptest! {
        #[test]
        fn translation_round_trips(
            moves in prop::collection::vec((0usize..32, 0usize..32), 0..16),
            index in 0usize..32,
        ) {
            let mut ops = MoveOperations::new();
            for (from, to) in moves {
                ops.move_item(from, to);
            }
            prop_assert_eq!(ops.visible_index(ops.model_index(index)), index);
            prop_assert_eq!(ops.model_index(ops.visible_index(index)), index);
        }

        #[test]
        fn translation_is_a_permutation(
            moves in prop::collection::vec((0usize..16, 0usize..16), 0..8),
        ) {
            let mut ops = MoveOperations::new();
            for (from, to) in moves {
                ops.move_item(from, to);
            }
            let mut seen: Vec<ModelIndex> = (0..16).map(|i| ops.model_index(i)).collect();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..16).collect::<Vec<_>>());
        }
    }
}
