//! Group highlighting.
//!
//! Every redraw derives one [`DrawInstruction`] per shape from the registry
//! and the current [`HighlightState`]. There is no diffing: the full set is
//! recomputed on every hover change and every resize.

use crate::catalog::{GroupId, ShapeId, TextureKey};
use crate::geometry::{Point, Viewport};
use crate::registry::ShapeRegistry;
use crate::texture::TextureRule;

/// Outline color for highlighted shapes (tomato, `#ff6347`).
pub const ACCENT: Rgb = Rgb::from_hex(0xff6347);

/// Outline width bounds in pixels.
pub const MIN_OUTLINE_WIDTH: f32 = 2.0;
pub const MAX_OUTLINE_WIDTH: f32 = 8.0;

/// Fraction of the viewport's shorter side used as outline width.
const OUTLINE_FACTOR: f32 = 0.005;

/// 8-bit sRGB color.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }
}

/// Which group, if any, is under the pointer.
///
/// `Idle` ⇄ `Hovering(group)`. The state tracks the group only, not the
/// shape that triggered it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HighlightState {
    #[default]
    Idle,
    Hovering(GroupId),
}

impl HighlightState {
    #[inline]
    pub fn hovered_group(&self) -> Option<&GroupId> {
        match self {
            HighlightState::Idle => None,
            HighlightState::Hovering(g) => Some(g),
        }
    }

    #[inline]
    pub fn is_highlighted(&self, group: &GroupId) -> bool {
        self.hovered_group() == Some(group)
    }

    /// Pointer entered a shape of `group`.
    pub fn enter(&mut self, group: GroupId) {
        *self = HighlightState::Hovering(group);
    }

    /// Pointer left a shape. Clears unconditionally: the last event wins.
    pub fn exit(&mut self) {
        *self = HighlightState::Idle;
    }
}

/// Stroke attached to a highlighted shape.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Outline {
    pub color: Rgb,
    pub width: f32,
}

/// Everything the presentation layer needs to draw one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawInstruction {
    pub shape_id: ShapeId,
    /// Absolute viewport coordinates; the path is closed by the renderer.
    pub points: Vec<Point>,
    pub fill: TextureKey,
    pub outline: Option<Outline>,
}

/// `clamp(round(0.005 * min(W, H)), 2, 8)`.
#[inline]
pub fn outline_width(viewport: Viewport) -> f32 {
    (OUTLINE_FACTOR * viewport.min_side())
        .round()
        .clamp(MIN_OUTLINE_WIDTH, MAX_OUTLINE_WIDTH)
}

/// Re-lays out every shape for `viewport` and derives the draw instructions in
/// registry order.
///
/// Calling this twice with the same inputs yields the same output.
pub fn recompute(
    registry: &mut ShapeRegistry,
    state: &HighlightState,
    rule: &TextureRule,
    viewport: Viewport,
) -> Vec<DrawInstruction> {
    registry.relayout(viewport);

    let outline = Outline { color: ACCENT, width: outline_width(viewport) };

    registry
        .iter()
        .map(|shape| DrawInstruction {
            shape_id: shape.id.clone(),
            points: shape.screen_points().to_vec(),
            fill: rule.select(&shape.group).clone(),
            outline: state.is_highlighted(&shape.group).then_some(outline),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::two_shape_registry;

    fn vp(w: f32, h: f32) -> Viewport {
        Viewport::new(w, h)
    }

    fn outlined(instructions: &[DrawInstruction]) -> Vec<&str> {
        instructions
            .iter()
            .filter(|i| i.outline.is_some())
            .map(|i| i.shape_id.as_str())
            .collect()
    }

    // ── outline_width ─────────────────────────────────────────────────────

    #[test]
    fn outline_width_follows_shorter_side() {
        assert_eq!(outline_width(vp(1000.0, 800.0)), 4.0);
        assert_eq!(outline_width(vp(1000.0, 1000.0)), 5.0);
        assert_eq!(outline_width(vp(1400.0, 1200.0)), 6.0);
    }

    #[test]
    fn outline_width_is_clamped() {
        assert_eq!(outline_width(vp(100.0, 100.0)), 2.0);
        assert_eq!(outline_width(vp(1.0, 5000.0)), 2.0);
        assert_eq!(outline_width(vp(4000.0, 3000.0)), 8.0);
    }

    #[test]
    fn outline_width_always_in_bounds() {
        for side in (1..6000).step_by(37) {
            let w = outline_width(vp(side as f32, side as f32 + 13.0));
            assert!((MIN_OUTLINE_WIDTH..=MAX_OUTLINE_WIDTH).contains(&w));
            let expected = (0.005 * side as f32).round().clamp(2.0, 8.0);
            assert_eq!(w, expected);
        }
    }

    // ── recompute ─────────────────────────────────────────────────────────

    #[test]
    fn idle_state_outlines_nothing() {
        let mut reg = two_shape_registry(vp(1000.0, 800.0));
        let out = recompute(&mut reg, &HighlightState::Idle, &TextureRule::default(), vp(1000.0, 800.0));
        assert_eq!(out.len(), 2);
        assert!(outlined(&out).is_empty());
    }

    #[test]
    fn hover_outlines_the_hovered_group_only() {
        let mut reg = two_shape_registry(vp(1000.0, 800.0));
        let rule = TextureRule::default();
        let mut state = HighlightState::Idle;

        state.enter(GroupId::new("A"));
        let out = recompute(&mut reg, &state, &rule, vp(1000.0, 800.0));
        assert_eq!(outlined(&out), ["s1"]);
        assert_eq!(out[0].outline, Some(Outline { color: ACCENT, width: 4.0 }));

        state.exit();
        let out = recompute(&mut reg, &state, &rule, vp(1000.0, 800.0));
        assert!(outlined(&out).is_empty());
    }

    #[test]
    fn whole_group_is_outlined() {
        use crate::catalog::Catalog;
        use crate::registry::tests::test_textures;

        let catalog = Catalog::from_json(
            r#"{ "shapes": [
                { "id": "a1", "group": "A", "texture": "textures/stone.jpg", "points": [[0,0],[0.2,0],[0.2,0.2]] },
                { "id": "b1", "group": "B", "texture": "textures/marble.jpg", "points": [[0.3,0],[0.5,0],[0.5,0.2]] },
                { "id": "a2", "group": "A", "texture": "textures/stone.jpg", "points": [[0.6,0],[0.8,0],[0.8,0.2]] }
            ] }"#,
        )
        .unwrap();
        let rule = TextureRule::default();
        let mut reg = ShapeRegistry::build(catalog, &test_textures(), &rule, vp(200.0, 200.0)).unwrap();

        let out = recompute(&mut reg, &HighlightState::Hovering(GroupId::new("A")), &rule, vp(200.0, 200.0));
        assert_eq!(outlined(&out), ["a1", "a2"]);
    }

    #[test]
    fn fill_follows_group_rule() {
        let mut reg = two_shape_registry(vp(100.0, 100.0));
        let out = recompute(&mut reg, &HighlightState::Idle, &TextureRule::default(), vp(100.0, 100.0));
        assert_eq!(out[0].fill.as_str(), "textures/stone.jpg");
        assert_eq!(out[1].fill.as_str(), "textures/marble.jpg");
    }

    #[test]
    fn output_is_in_registry_order() {
        let mut reg = two_shape_registry(vp(100.0, 100.0));
        let out = recompute(&mut reg, &HighlightState::Idle, &TextureRule::default(), vp(100.0, 100.0));
        let ids: Vec<_> = out.iter().map(|i| i.shape_id.as_str()).collect();
        assert_eq!(ids, ["s1", "s2"]);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut reg = two_shape_registry(vp(1000.0, 800.0));
        let rule = TextureRule::default();
        let state = HighlightState::Hovering(GroupId::new("B"));

        let first = recompute(&mut reg, &state, &rule, vp(1000.0, 800.0));
        let second = recompute(&mut reg, &state, &rule, vp(1000.0, 800.0));
        assert_eq!(first, second);
    }

    #[test]
    fn resize_recomputes_geometry() {
        use crate::catalog::Catalog;
        use crate::registry::tests::test_textures;

        let catalog = Catalog::from_json(
            r#"{ "shapes": [ { "id": "c", "group": "A", "texture": "textures/stone.jpg",
                 "points": [[0.5, 0.5], [1.0, 0.5], [1.0, 1.0]] } ] }"#,
        )
        .unwrap();
        let rule = TextureRule::default();
        let mut reg = ShapeRegistry::build(catalog, &test_textures(), &rule, vp(1000.0, 800.0)).unwrap();

        let before = recompute(&mut reg, &HighlightState::Idle, &rule, vp(1000.0, 800.0));
        assert_eq!(before[0].points[0], Point::new(500.0, 400.0));

        let after = recompute(&mut reg, &HighlightState::Idle, &rule, vp(500.0, 500.0));
        assert_eq!(after[0].points[0], Point::new(250.0, 250.0));
        assert_eq!(after[0].points[2], Point::new(500.0, 500.0));
    }

    #[test]
    fn accent_is_tomato() {
        assert_eq!(ACCENT, Rgb { r: 0xff, g: 0x63, b: 0x47 });
    }
}
