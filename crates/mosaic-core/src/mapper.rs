//! Normalized catalog space → viewport pixels.
//!
//! The unit square maps onto the largest square that fits the viewport,
//! centered on the longer axis. Aspect ratio is preserved regardless of the
//! window's proportions.

use crate::geometry::{Point, Viewport};

/// Placement of the unit square inside a viewport.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SquareFit {
    /// Side of the square in pixels: `min(W, H)`.
    pub base: f32,
    /// Top-left corner of the square in pixels.
    pub offset: Point,
}

impl SquareFit {
    #[inline]
    pub fn map(self, p: Point) -> Point {
        Point::new(p.x * self.base + self.offset.x, p.y * self.base + self.offset.y)
    }
}

/// Computes the centered square for `viewport`.
#[inline]
pub fn square_fit(viewport: Viewport) -> SquareFit {
    let base = viewport.min_side();
    SquareFit {
        base,
        offset: Point::new((viewport.width - base) / 2.0, (viewport.height - base) / 2.0),
    }
}

/// Maps a normalized point list to absolute viewport coordinates.
pub fn map_points(points: &[Point], viewport: Viewport) -> Vec<Point> {
    let fit = square_fit(viewport);
    points.iter().map(|&p| fit.map(p)).collect()
}
