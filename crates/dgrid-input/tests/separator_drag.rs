//! End-to-end drag gestures against a real layout pass.
//!
//! A 5x10 grid with the default theme and a 10px monospace measure lays
//! out every auto-sized column at 80px ("Column0" is seven characters plus
//! header padding), with the grid body starting at canvas x 30.

use dgrid_core::geometry::GridPoint;
use dgrid_core::index::MoveOperations;
use dgrid_core::measure::MonospaceMeasure;
use dgrid_core::mock::MockGridModel;
use dgrid_core::theme::GridTheme;
use dgrid_input::{ColumnSeparatorHandler, GridSeparator, SeparatorHost};
use dgrid_metrics::{GridMetricCalculator, GridMetricState, GridMetrics};

struct TestHost {
    theme: GridTheme,
    calculator: GridMetricCalculator,
    metrics: Option<GridMetrics>,
    model: MockGridModel,
    measure: MonospaceMeasure,
    moved_rows: MoveOperations,
    moved_columns: MoveOperations,
    separator: Option<GridSeparator>,
    redraws: usize,
}

impl TestHost {
    fn new() -> Self {
        Self {
            theme: GridTheme::default(),
            calculator: GridMetricCalculator::new(),
            metrics: None,
            model: MockGridModel::new(5, 10),
            measure: MonospaceMeasure::new(10.0),
            moved_rows: MoveOperations::new(),
            moved_columns: MoveOperations::new(),
            separator: None,
            redraws: 0,
        }
    }

    /// Run a layout pass, as the grid would before painting.
    fn layout(&mut self) {
        let mut state = GridMetricState {
            left: 0,
            top: 0,
            left_offset: 0.0,
            top_offset: 0.0,
            width: 500.0,
            height: 300.0,
            context: &mut self.measure,
            theme: &self.theme,
            model: &self.model,
            moved_rows: &self.moved_rows,
            moved_columns: &self.moved_columns,
        };
        self.metrics = Some(self.calculator.get_metrics(&mut state));
    }
}

impl SeparatorHost for TestHost {
    fn metrics(&self) -> Option<&GridMetrics> {
        self.metrics.as_ref()
    }

    fn theme(&self) -> &GridTheme {
        &self.theme
    }

    fn calculator_mut(&mut self) -> &mut GridMetricCalculator {
        &mut self.calculator
    }

    fn set_separator(&mut self, separator: Option<GridSeparator>) {
        self.separator = separator;
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }
}

fn header_point(x: f64) -> GridPoint {
    GridPoint::new(x, 10.0)
}

#[test]
fn drag_sets_a_column_width_override() {
    let mut host = TestHost::new();
    host.layout();
    let mut handler = ColumnSeparatorHandler::new();

    // Column 0's separator sits at canvas x 110.
    assert!(handler.on_down(header_point(110.0), &mut host));
    assert!(handler.is_dragging());
    assert_eq!(host.separator, Some(GridSeparator { index: 0, depth: 0 }));

    assert!(handler.on_drag(header_point(230.0), &mut host));
    assert_eq!(host.calculator.user_column_width(0), Some(200.0));

    handler.on_up(header_point(230.0), &mut host);
    assert!(!handler.is_dragging());
    assert_eq!(host.separator, None);
}

#[test]
fn drag_near_calculated_size_clears_the_override() {
    let mut host = TestHost::new();
    host.calculator.set_column_width(0, 200.0);
    host.layout();
    let mut handler = ColumnSeparatorHandler::new();

    assert!(handler.on_down(header_point(230.0), &mut host));
    // 85px is within the snap threshold of the calculated 80px.
    assert!(handler.on_drag(header_point(115.0), &mut host));
    assert_eq!(host.calculator.user_column_width(0), None);
}

#[test]
fn drag_below_hidden_threshold_collapses_the_column() {
    let mut host = TestHost::new();
    host.layout();
    let mut handler = ColumnSeparatorHandler::new();

    assert!(handler.on_down(header_point(110.0), &mut host));
    assert!(handler.on_drag(header_point(35.0), &mut host));
    assert_eq!(host.calculator.user_column_width(0), Some(0.0));
}

#[test]
fn hover_over_a_hidden_separator_switches_the_cursor() {
    let mut host = TestHost::new();
    host.calculator.set_column_width(0, 0.0);
    host.layout();
    let mut handler = ColumnSeparatorHandler::new();

    assert!(handler.on_move(header_point(32.0), &mut host));
    assert_eq!(handler.cursor(), Some("e-resize"));

    assert!(handler.on_move(header_point(190.0), &mut host));
    assert_eq!(handler.cursor(), Some("col-resize"));
}

#[test]
fn dragging_past_a_hidden_run_reveals_items_one_by_one() {
    let mut host = TestHost::new();
    host.calculator.set_column_width(1, 0.0);
    host.calculator.set_column_width(2, 0.0);
    host.layout();
    let mut handler = ColumnSeparatorHandler::new();

    // Columns 1 and 2 are collapsed at grid x 80; the nudged hit band
    // just past the boundary belongs to column 2.
    assert!(handler.on_down(header_point(112.0), &mut host));
    assert_eq!(host.separator.map(|s| s.index), Some(2));

    // Growing past column 2's natural 80px hands the remainder to the
    // hidden column 1: column 2 returns to auto, column 1 gets 20px.
    assert!(handler.on_drag(header_point(210.0), &mut host));
    assert_eq!(host.calculator.user_column_width(2), None);
    assert_eq!(host.calculator.user_column_width(1), Some(20.0));
}

#[test]
fn retreating_over_a_revealed_item_hides_it_again() {
    let mut host = TestHost::new();
    host.calculator.set_column_width(1, 0.0);
    host.calculator.set_column_width(2, 0.0);
    host.layout();
    let mut handler = ColumnSeparatorHandler::new();

    assert!(handler.on_down(header_point(112.0), &mut host));
    assert!(handler.on_drag(header_point(210.0), &mut host));

    // Pulling back past the revealed column 1 collapses it and resumes
    // resizing column 2 without the reveal offset.
    assert!(handler.on_drag(header_point(140.0), &mut host));
    assert_eq!(host.calculator.user_column_width(1), Some(0.0));
    assert_eq!(host.calculator.user_column_width(2), Some(30.0));
}

#[test]
fn shrinking_through_zero_pulls_in_the_previous_column() {
    let mut host = TestHost::new();
    host.layout();
    let mut handler = ColumnSeparatorHandler::new();

    // Start on column 1's separator at canvas x 190 and drag all the way
    // back into column 0's range.
    assert!(handler.on_down(header_point(190.0), &mut host));
    assert!(handler.on_drag(header_point(90.0), &mut host));
    assert_eq!(host.calculator.user_column_width(1), Some(0.0));
    // Column 0 joined the resize, ending 60px wide under the pointer.
    assert_eq!(host.calculator.user_column_width(0), Some(60.0));
}

#[test]
fn double_click_toggles_between_autofit_and_auto() {
    let mut host = TestHost::new();
    host.calculator.set_column_width(0, 150.0);
    host.layout();
    let mut handler = ColumnSeparatorHandler::new();

    // An override away from the calculated size pins the calculated size.
    assert!(handler.on_double_click(header_point(180.0), &mut host));
    assert_eq!(host.calculator.user_column_width(0), Some(80.0));
    assert_eq!(host.redraws, 1);

    // An override equal to the calculated size drops back to auto.
    host.layout();
    assert!(handler.on_double_click(header_point(110.0), &mut host));
    assert_eq!(host.calculator.user_column_width(0), None);
    assert_eq!(host.redraws, 2);
}

#[test]
fn events_away_from_a_separator_are_not_consumed() {
    let mut host = TestHost::new();
    host.layout();
    let mut handler = ColumnSeparatorHandler::new();

    assert!(!handler.on_down(GridPoint::new(150.0, 150.0), &mut host));
    assert!(!handler.on_move(header_point(150.0), &mut host));
    assert!(!handler.is_dragging());
}
