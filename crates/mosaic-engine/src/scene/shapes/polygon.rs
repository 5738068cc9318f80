use crate::coords::{Rect, Vec2};
use crate::paint::{Color, Paint};
use crate::scene::{DrawCmd, DrawList, Layer};

use super::Border;

/// Closed polygon draw payload.
///
/// `points` are logical pixel positions in winding order; the closing edge
/// from the last point back to the first is implied.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonCmd {
    pub points: Vec<Vec2>,
    pub paint: Paint,
    pub border: Option<Border>,
}

impl DrawList {
    /// Records a polygon draw command.
    #[inline]
    pub fn push_polygon(
        &mut self,
        layer: Layer,
        points: Vec<Vec2>,
        paint: Paint,
        border: Option<Border>,
    ) {
        self.push(layer, DrawCmd::Polygon(PolygonCmd { points, paint, border }));
    }

    /// Records an axis-aligned rectangle as a flat-colored quad.
    pub fn push_solid_rect(&mut self, layer: Layer, rect: Rect, color: Color) {
        self.push_polygon(layer, rect.corners().to_vec(), Paint::Solid(color), None);
    }
}
