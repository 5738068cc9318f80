use super::{DrawCmd, Layer, SortKey};

/// A single draw item: sort key + command.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
}

/// Draw stream recorded for one frame.
///
/// The viewer clears and refills it every frame. Paint order is computed
/// lazily and cached until the next push.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    paint_order: Vec<usize>,
    order_dirty: bool,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items. Keeps allocated capacity for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
        self.paint_order.clear();
        self.next_order = 0;
        self.order_dirty = false;
    }

    /// Items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, layer: Layer, cmd: DrawCmd) {
        let key = SortKey::new(layer, self.next_order);
        self.next_order = self.next_order.wrapping_add(1);
        self.items.push(DrawItem { key, cmd });
        self.order_dirty = true;
    }

    /// Iterates items back to front.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.order_dirty {
            let items = &self.items;
            self.paint_order.clear();
            self.paint_order.extend(0..items.len());
            self.paint_order.sort_by_key(|&i| items[i].key);
            self.order_dirty = false;
        }
        self.paint_order.iter().map(|&i| &self.items[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Rect, Vec2};
    use crate::paint::{Color, Paint};

    fn tri(x: f32) -> Vec<Vec2> {
        vec![Vec2::new(x, 0.0), Vec2::new(x + 1.0, 0.0), Vec2::new(x, 1.0)]
    }

    fn first_x(item: &DrawItem) -> f32 {
        match &item.cmd {
            DrawCmd::Polygon(p) => p.points[0].x,
            DrawCmd::Text(t) => t.origin.x,
        }
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn same_layer_keeps_insertion_order() {
        let mut list = DrawList::new();
        for x in [3.0, 1.0, 2.0] {
            list.push_polygon(Layer::Shapes, tri(x), Paint::Solid(Color::white()), None);
        }
        let xs: Vec<f32> = list.iter_in_paint_order().map(first_x).collect();
        assert_eq!(xs, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn overlay_paints_after_shapes_pushed_later() {
        let mut list = DrawList::new();
        list.push_solid_rect(Layer::Overlay, Rect::new(9.0, 0.0, 1.0, 1.0), Color::white());
        list.push_polygon(Layer::Shapes, tri(1.0), Paint::Solid(Color::white()), None);
        let xs: Vec<f32> = list.iter_in_paint_order().map(first_x).collect();
        assert_eq!(xs, vec![1.0, 9.0]);
    }

    #[test]
    fn solid_rect_becomes_quad() {
        let mut list = DrawList::new();
        list.push_solid_rect(Layer::Overlay, Rect::new(1.0, 2.0, 3.0, 4.0), Color::white());
        let DrawCmd::Polygon(p) = &list.items()[0].cmd else { panic!("expected polygon") };
        assert_eq!(p.points.len(), 4);
        assert_eq!(p.points[2], Vec2::new(4.0, 6.0));
        assert!(p.border.is_none());
    }

    // ── clear ─────────────────────────────────────────────────────────────

    #[test]
    fn clear_resets_items() {
        let mut list = DrawList::new();
        list.push_polygon(Layer::Shapes, tri(0.0), Paint::Solid(Color::white()), None);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.iter_in_paint_order().count(), 0);
    }
}
