//! Small plain geometry structs shared across the workspace.

/// A point in canvas space, relative to the top-left of the grid canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
}

impl GridPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box, used for tree expand/collapse hit regions.
///
/// Coordinates are relative to the owning cell, not the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxCoordinates {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoxCoordinates {
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Whether the point is inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_contains_edges() {
        let b = BoxCoordinates::new(5.0, 0.0, 15.0, 20.0);
        assert!(b.contains(5.0, 0.0));
        assert!(b.contains(15.0, 20.0));
        assert!(b.contains(10.0, 10.0));
        assert!(!b.contains(4.9, 10.0));
        assert!(!b.contains(10.0, 20.1));
    }
}
