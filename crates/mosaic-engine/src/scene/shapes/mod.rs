pub(crate) mod polygon;
pub(crate) mod text;

pub use polygon::PolygonCmd;
pub use text::TextCmd;

use crate::paint::Color;

/// Stroke drawn along the edges of a shape, centered on the path.
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

impl Border {
    #[inline]
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}
