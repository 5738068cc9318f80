//! Conversion from core draw instructions to the engine draw stream.

use std::collections::HashMap;

use mosaic_core::{DrawInstruction, Point, Rgb, TextureKey};
use mosaic_engine::coords::{Rect, Vec2};
use mosaic_engine::paint::{Color, Paint, TextureId};
use mosaic_engine::scene::{Border, DrawList, Layer};
use mosaic_engine::text::FontId;

pub const PANEL_FONT_SIZE: f32 = 16.0;
const PANEL_MARGIN: f32 = 12.0;
const PANEL_PADDING: f32 = 8.0;

/// Engine texture handles keyed by asset path.
pub type TextureMap = HashMap<TextureKey, TextureId>;

#[inline]
pub fn rgb_to_color(c: Rgb) -> Color {
    Color::from_srgb_u8(c.r, c.g, c.b, 255)
}

#[inline]
fn to_vec2(p: &Point) -> Vec2 {
    Vec2::new(p.x, p.y)
}

/// Records one textured polygon per instruction, in registry order.
///
/// A fill key without an engine texture is drawn flat grey; the loader
/// rejects such catalogs, so this only shows up for registration bugs.
pub fn push_shapes(list: &mut DrawList, instructions: &[DrawInstruction], textures: &TextureMap) {
    for inst in instructions {
        let paint = match textures.get(&inst.fill) {
            Some(id) => Paint::Texture(*id),
            None => {
                log::debug!("no texture registered for '{}'", inst.fill);
                Paint::Solid(Color::from_hex_rgb(0x9a9a9a))
            }
        };
        let border = inst
            .outline
            .map(|o| Border::new(o.width, rgb_to_color(o.color)));
        let points = inst.points.iter().map(to_vec2).collect();
        list.push_polygon(Layer::Shapes, points, paint, border);
    }
}

/// Panel background for a text block of `text_size`, anchored top-left.
pub fn panel_rect(text_size: Vec2) -> Rect {
    Rect::new(
        PANEL_MARGIN,
        PANEL_MARGIN,
        text_size.x + 2.0 * PANEL_PADDING,
        text_size.y + 2.0 * PANEL_PADDING,
    )
}

/// Records the info panel: a light backing rect and the text on top.
pub fn push_info_panel(list: &mut DrawList, text: &str, font: FontId, text_size: Vec2) {
    let rect = panel_rect(text_size);
    list.push_solid_rect(Layer::Overlay, rect, Color::from_straight(1.0, 1.0, 1.0, 0.9));
    list.push_text(
        Layer::OverlayText,
        text,
        font,
        PANEL_FONT_SIZE,
        Color::from_hex_rgb(0x222222),
        rect.origin + Vec2::new(PANEL_PADDING, PANEL_PADDING),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_core::{Outline, ShapeId, ACCENT};
    use mosaic_engine::scene::DrawCmd;

    fn instruction(id: &str, fill: &str, outline: Option<Outline>) -> DrawInstruction {
        DrawInstruction {
            shape_id: ShapeId::new(id),
            points: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0)],
            fill: TextureKey::new(fill),
            outline,
        }
    }

    fn polygons(list: &DrawList) -> Vec<&mosaic_engine::scene::shapes::PolygonCmd> {
        list.items()
            .iter()
            .filter_map(|i| match &i.cmd {
                DrawCmd::Polygon(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    // ── shapes ────────────────────────────────────────────────────────────

    #[test]
    fn fills_resolve_to_registered_textures() {
        let stone = TextureKey::new("textures/stone.jpg");
        let mut textures = TextureMap::new();
        let mut renderer = mosaic_engine::render::shapes::polygon::PolygonRenderer::new();
        let id = renderer.add_texture("stone", 1, 1, vec![0; 4]).unwrap();
        textures.insert(stone, id);

        let mut list = DrawList::new();
        push_shapes(&mut list, &[instruction("s1", "textures/stone.jpg", None)], &textures);

        let polys = polygons(&list);
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].paint, Paint::Texture(id));
        assert_eq!(polys[0].points[1], Vec2::new(10.0, 0.0));
        assert!(polys[0].border.is_none());
    }

    #[test]
    fn outline_becomes_accent_border() {
        let outline = Outline { color: ACCENT, width: 4.0 };
        let mut list = DrawList::new();
        push_shapes(&mut list, &[instruction("s1", "x", Some(outline))], &TextureMap::new());

        let border = polygons(&list)[0].border.clone().unwrap();
        assert_eq!(border.width, 4.0);
        assert_eq!(border.color, Color::from_hex_rgb(0xff6347));
    }

    #[test]
    fn unknown_fill_is_flat() {
        let mut list = DrawList::new();
        push_shapes(&mut list, &[instruction("s1", "missing.jpg", None)], &TextureMap::new());
        assert!(matches!(polygons(&list)[0].paint, Paint::Solid(_)));
    }

    // ── info panel ────────────────────────────────────────────────────────

    #[test]
    fn panel_wraps_text_with_padding() {
        let r = panel_rect(Vec2::new(100.0, 20.0));
        assert_eq!(r, Rect::new(12.0, 12.0, 116.0, 36.0));
    }
}
