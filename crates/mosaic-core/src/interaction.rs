//! Single-threaded event dispatch.
//!
//! The presentation layer turns pointer and window activity into
//! [`SceneEvent`]s and feeds them, one at a time, to
//! [`SceneController::dispatch`]. The controller owns the registry and the
//! highlight context, and answers each event with what must be redrawn or
//! displayed.

use crate::catalog::ShapeId;
use crate::geometry::{Point, Viewport};
use crate::highlight::{self, DrawInstruction, HighlightState};
use crate::registry::{ShapeRecord, ShapeRegistry};
use crate::texture::TextureRule;

/// Input to [`SceneController::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    HoverEnter(ShapeId),
    HoverExit(ShapeId),
    Resize { width: f32, height: f32 },
    Click(ShapeId),
}

/// Result of dispatching one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatch {
    /// Full replacement draw set, when anything needs repainting.
    pub redraw: Option<Vec<DrawInstruction>>,
    /// Text for the display sink.
    pub display: Option<String>,
}

/// Owns the shape registry, the highlight context and the current viewport.
#[derive(Debug)]
pub struct SceneController {
    registry: ShapeRegistry,
    rule: TextureRule,
    state: HighlightState,
    viewport: Viewport,
}

impl SceneController {
    pub fn new(registry: ShapeRegistry, rule: TextureRule) -> Self {
        let viewport = registry.viewport();
        Self { registry, rule, state: HighlightState::Idle, viewport }
    }

    #[inline]
    pub fn state(&self) -> &HighlightState {
        &self.state
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Topmost shape under `p` in the current layout.
    pub fn shape_at(&self, p: Point) -> Option<&ShapeRecord> {
        self.registry.shape_at(p)
    }

    /// Draw set for the current state, without changing anything.
    pub fn draw_instructions(&mut self) -> Vec<DrawInstruction> {
        highlight::recompute(&mut self.registry, &self.state, &self.rule, self.viewport)
    }

    /// Applies one event.
    ///
    /// Hover and resize events always produce a full redraw. Clicks only
    /// produce display text. Events naming an unknown shape are ignored.
    pub fn dispatch(&mut self, event: SceneEvent) -> Dispatch {
        match event {
            SceneEvent::HoverEnter(id) => {
                let Some(shape) = self.lookup(&id) else { return Dispatch::default() };
                let group = shape.group.clone();
                log::debug!("hover enter '{id}' (group '{group}')");
                self.state.enter(group);
                self.redraw()
            }

            SceneEvent::HoverExit(id) => {
                if self.lookup(&id).is_none() {
                    return Dispatch::default();
                }
                log::debug!("hover exit '{id}'");
                self.state.exit();
                self.redraw()
            }

            SceneEvent::Resize { width, height } => {
                let viewport = Viewport::new(width, height);
                if !viewport.is_valid() {
                    // Minimized windows report 0×0; keep the last usable layout.
                    log::debug!("ignoring resize to {width}x{height}");
                    return Dispatch::default();
                }
                self.viewport = viewport;
                self.redraw()
            }

            SceneEvent::Click(id) => {
                let Some(shape) = self.lookup(&id) else { return Dispatch::default() };
                let text = shape.describe();
                log::info!("clicked shape: id={}, group={}", shape.id, shape.group);
                Dispatch { redraw: None, display: Some(text) }
            }
        }
    }

    fn lookup(&self, id: &ShapeId) -> Option<&ShapeRecord> {
        let shape = self.registry.get(id);
        if shape.is_none() {
            log::warn!("event for unknown shape '{id}' ignored");
        }
        shape
    }

    fn redraw(&mut self) -> Dispatch {
        Dispatch { redraw: Some(self.draw_instructions()), display: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, GroupId};
    use crate::registry::tests::{test_textures, two_shape_registry};

    fn controller(w: f32, h: f32) -> SceneController {
        SceneController::new(two_shape_registry(Viewport::new(w, h)), TextureRule::default())
    }

    fn id(s: &str) -> ShapeId {
        ShapeId::new(s)
    }

    fn outlined(d: &Dispatch) -> Vec<String> {
        d.redraw
            .as_ref()
            .unwrap()
            .iter()
            .filter(|i| i.outline.is_some())
            .map(|i| i.shape_id.to_string())
            .collect()
    }

    #[test]
    fn starts_idle() {
        let c = controller(1000.0, 800.0);
        assert_eq!(c.state(), &HighlightState::Idle);
        assert_eq!(c.viewport(), Viewport::new(1000.0, 800.0));
    }

    #[test]
    fn hover_enter_then_exit() {
        let mut c = controller(1000.0, 800.0);

        let d = c.dispatch(SceneEvent::HoverEnter(id("s1")));
        assert_eq!(c.state(), &HighlightState::Hovering(GroupId::new("A")));
        assert_eq!(outlined(&d), ["s1"]);
        assert!(d.display.is_none());

        let d = c.dispatch(SceneEvent::HoverExit(id("s1")));
        assert_eq!(c.state(), &HighlightState::Idle);
        assert!(outlined(&d).is_empty());
    }

    #[test]
    fn last_event_wins_on_interleaved_hover() {
        let mut c = controller(100.0, 100.0);

        // Pointer crosses from s1 into the overlapping s2, enter delivered first.
        c.dispatch(SceneEvent::HoverEnter(id("s1")));
        c.dispatch(SceneEvent::HoverEnter(id("s2")));
        let d = c.dispatch(SceneEvent::HoverExit(id("s1")));

        assert_eq!(c.state(), &HighlightState::Idle);
        assert!(outlined(&d).is_empty());
    }

    #[test]
    fn resize_relayouts_and_redraws() {
        let mut c = controller(1000.0, 800.0);
        c.dispatch(SceneEvent::HoverEnter(id("s2")));

        let d = c.dispatch(SceneEvent::Resize { width: 500.0, height: 500.0 });
        let draw = d.redraw.unwrap();

        assert_eq!(c.viewport(), Viewport::new(500.0, 500.0));
        // s1's second point is (0.5, 0.0).
        assert_eq!(draw[0].points[1], Point::new(250.0, 0.0));
        // Hover survives the resize; outline width follows the new size.
        assert_eq!(
            draw[1].outline.map(|o| o.width),
            Some(highlight::outline_width(Viewport::new(500.0, 500.0)))
        );
        assert!(draw[0].outline.is_none());
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut c = controller(1000.0, 800.0);
        let d = c.dispatch(SceneEvent::Resize { width: 0.0, height: 0.0 });
        assert_eq!(d, Dispatch::default());
        assert_eq!(c.viewport(), Viewport::new(1000.0, 800.0));
    }

    #[test]
    fn click_reports_group_and_id_without_redraw() {
        let catalog = Catalog::from_json(
            r#"{ "shapes": [ { "id": "t3", "group": "B", "texture": "textures/marble.jpg",
                 "points": [[0,0],[1,0],[1,1]] } ] }"#,
        )
        .unwrap();
        let rule = TextureRule::default();
        let reg =
            ShapeRegistry::build(catalog, &test_textures(), &rule, Viewport::new(10.0, 10.0)).unwrap();
        let mut c = SceneController::new(reg, rule);

        let d = c.dispatch(SceneEvent::Click(id("t3")));
        assert_eq!(d.display.as_deref(), Some("Group: B | ID: t3"));
        assert!(d.redraw.is_none());
        assert_eq!(c.state(), &HighlightState::Idle);
    }

    #[test]
    fn unknown_shape_is_ignored() {
        let mut c = controller(100.0, 100.0);
        c.dispatch(SceneEvent::HoverEnter(id("s1")));

        assert_eq!(c.dispatch(SceneEvent::HoverExit(id("nope"))), Dispatch::default());
        assert_eq!(c.dispatch(SceneEvent::Click(id("nope"))), Dispatch::default());
        assert_eq!(c.state(), &HighlightState::Hovering(GroupId::new("A")));
    }
}
