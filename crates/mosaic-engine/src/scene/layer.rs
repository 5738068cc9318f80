/// Paint layer of a draw item. Later variants paint over earlier ones.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Default)]
pub enum Layer {
    /// Catalog shapes and their outlines.
    #[default]
    Shapes,
    /// Screen-space panels drawn over the shapes.
    Overlay,
    /// Text on top of overlays.
    OverlayText,
}

/// Paint-order key: layer first, then insertion order within the layer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SortKey {
    pub layer: Layer,
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(layer: Layer, order: u32) -> Self {
        Self { layer, order }
    }
}
