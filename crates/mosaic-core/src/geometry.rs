//! Plain geometry values shared by the mapper, registry and highlight engine.

use serde::Deserialize;

/// 2D point. Units depend on context: catalog space (`[0, 1]`) or
/// viewport pixels (top-left origin, +Y down).
#[derive(Debug, Copy, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// `true` when both coordinates lie in the closed unit interval.
    #[inline]
    pub fn is_normalized(self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

impl From<[f32; 2]> for Point {
    #[inline]
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

/// Viewport size in pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Side of the largest square that fits the viewport.
    #[inline]
    pub fn min_side(self) -> f32 {
        self.width.min(self.height)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

/// Even-odd containment test for a closed polygon.
///
/// The path is closed implicitly (last point connects back to the first).
/// Polygons with fewer than three points contain nothing.
pub fn polygon_contains(points: &[Point], p: Point) -> bool {
    if points.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    // ── polygon_contains ──────────────────────────────────────────────────

    #[test]
    fn contains_interior_point() {
        assert!(polygon_contains(&square(), Point::new(5.0, 5.0)));
    }

    #[test]
    fn rejects_exterior_points() {
        assert!(!polygon_contains(&square(), Point::new(-1.0, 5.0)));
        assert!(!polygon_contains(&square(), Point::new(5.0, 11.0)));
    }

    #[test]
    fn concave_notch_is_outside() {
        // U shape: the notch between the arms is not part of the polygon.
        let u = vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 6.0),
            Point::new(6.0, 6.0),
            Point::new(6.0, 0.0),
            Point::new(9.0, 0.0),
            Point::new(9.0, 9.0),
            Point::new(0.0, 9.0),
        ];
        assert!(!polygon_contains(&u, Point::new(4.5, 3.0)));
        assert!(polygon_contains(&u, Point::new(1.5, 3.0)));
        assert!(polygon_contains(&u, Point::new(4.5, 7.5)));
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        let line = vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        assert!(!polygon_contains(&line, Point::new(5.0, 5.0)));
    }

    // ── Point ─────────────────────────────────────────────────────────────

    #[test]
    fn normalized_bounds_are_inclusive() {
        assert!(Point::new(0.0, 1.0).is_normalized());
        assert!(!Point::new(-0.01, 0.5).is_normalized());
        assert!(!Point::new(0.5, 1.01).is_normalized());
    }

    #[test]
    fn deserializes_from_pair() {
        let p: Point = serde_json::from_str("[0.25, 0.75]").unwrap();
        assert_eq!(p, Point::new(0.25, 0.75));
    }
}
