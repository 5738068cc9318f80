use anyhow::Result;

use mosaic_core::{DrawInstruction, LoadedScene, Point, SceneController, SceneEvent, TextureRule};
use mosaic_engine::core::{App, AppControl, FrameCtx};
use mosaic_engine::input::{ButtonState, InputEvent, Key};
use mosaic_engine::paint::Color;
use mosaic_engine::render::shapes::polygon::PolygonRenderer;
use mosaic_engine::render::shapes::text::TextRenderer;
use mosaic_engine::scene::DrawList;
use mosaic_engine::text::{FontId, FontSystem};
use mosaic_engine::window::CursorIcon;

use crate::draw::{self, TextureMap, PANEL_FONT_SIZE};
use crate::pointer::HoverTracker;

/// Viewer application: routes window input through the scene controller and
/// draws whatever it answers with.
pub struct ViewerApp {
    controller: SceneController,
    hover: HoverTracker,
    /// Last pointer position inside the window, for re-hit-testing on resize.
    pointer: Option<(f32, f32)>,

    instructions: Vec<DrawInstruction>,
    info: Option<String>,

    background: Color,
    textures: TextureMap,
    font: Option<FontId>,
    fonts: FontSystem,

    draw_list: DrawList,
    polygons: PolygonRenderer,
    text: TextRenderer,
}

impl ViewerApp {
    /// Hands the decoded textures to the polygon renderer and builds the
    /// initial draw set.
    pub fn new(
        scene: LoadedScene,
        rule: TextureRule,
        background: Color,
        font_bytes: Option<Vec<u8>>,
    ) -> Result<Self> {
        let mut polygons = PolygonRenderer::new();
        let mut textures = TextureMap::new();
        for image in scene.textures.iter() {
            let id = polygons.add_texture(
                image.key.as_str(),
                image.width,
                image.height,
                image.rgba.clone(),
            )?;
            textures.insert(image.key.clone(), id);
        }

        let mut fonts = FontSystem::new();
        let font = match font_bytes {
            Some(bytes) => match fonts.load_font(&bytes) {
                Ok(id) => Some(id),
                Err(e) => {
                    log::warn!("{e}; info panel text disabled");
                    None
                }
            },
            None => {
                log::warn!("no font found; info panel text disabled (use --font)");
                None
            }
        };

        let mut controller = SceneController::new(scene.registry, rule);
        let instructions = controller.draw_instructions();

        Ok(Self {
            controller,
            hover: HoverTracker::new(),
            pointer: None,
            instructions,
            info: None,
            background,
            textures,
            font,
            fonts,
            draw_list: DrawList::new(),
            polygons,
            text: TextRenderer::new(),
        })
    }

    fn dispatch(&mut self, event: SceneEvent) {
        let out = self.controller.dispatch(event);
        if let Some(instructions) = out.redraw {
            self.instructions = instructions;
        }
        if let Some(text) = out.display {
            self.info = Some(text);
        }
    }

    fn dispatch_all(&mut self, events: Vec<SceneEvent>) {
        for ev in events {
            self.dispatch(ev);
        }
    }

    fn hit(&self, x: f32, y: f32) -> Option<mosaic_core::ShapeId> {
        self.controller
            .shape_at(Point::new(x, y))
            .map(|shape| shape.id.clone())
    }

    /// Re-runs hover tracking for the pointer at `(x, y)`.
    fn hover_at(&mut self, x: f32, y: f32) {
        let hit = self.hit(x, y);
        let events = self.hover.update(hit);
        self.dispatch_all(events);
    }

    /// Relayouts on a size change. Shapes move under a resting pointer, so
    /// hover is re-evaluated at its last position.
    fn sync_viewport(&mut self, width: f32, height: f32) {
        let current = self.controller.viewport();
        if current.width == width && current.height == height {
            return;
        }
        self.dispatch(SceneEvent::Resize { width, height });
        if let Some((x, y)) = self.pointer {
            self.hover_at(x, y);
        }
    }

    fn handle_input(&mut self, ev: &InputEvent) -> AppControl {
        match ev {
            InputEvent::PointerMoved { x, y } => {
                self.pointer = Some((*x, *y));
                self.hover_at(*x, *y);
            }

            InputEvent::PointerLeft => {
                self.pointer = None;
                let events = self.hover.leave();
                self.dispatch_all(events);
            }

            InputEvent::Focused(false) => {
                let events = self.hover.leave();
                self.dispatch_all(events);
            }

            // Any button reports the shape, like a pointer-down.
            InputEvent::PointerButton { state: ButtonState::Pressed, x, y, .. } => {
                if let Some(id) = self.hit(*x, *y) {
                    self.dispatch(SceneEvent::Click(id));
                }
            }

            InputEvent::Key { key: Key::Escape, state: ButtonState::Pressed, .. } => {
                return AppControl::Exit;
            }

            _ => {}
        }
        AppControl::Continue
    }

    fn build_draw_list(&mut self) {
        self.draw_list.clear();
        draw::push_shapes(&mut self.draw_list, &self.instructions, &self.textures);

        if let (Some(text), Some(font)) = (self.info.as_deref(), self.font) {
            let size = self.fonts.measure_text(text, font, PANEL_FONT_SIZE);
            draw::push_info_panel(&mut self.draw_list, text, font, size);
        }
    }
}

impl App for ViewerApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let viewport = ctx.window.viewport();
        self.sync_viewport(viewport.width, viewport.height);

        for ev in &ctx.input_frame.events {
            if self.handle_input(ev) == AppControl::Exit {
                return AppControl::Exit;
            }
        }

        let cursor = if self.hover.current().is_some() { CursorIcon::Pointer } else { CursorIcon::Default };
        ctx.window.set_cursor(cursor);

        self.build_draw_list();

        let Self { draw_list, polygons, text, fonts, background, .. } = self;
        ctx.render(*background, |rctx, target| {
            polygons.render(rctx, target, draw_list);
            text.render(rctx, target, draw_list, fonts);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_core::{
        Catalog, GroupId, HighlightState, ShapeId, ShapeRegistry, TextureImage, TextureKey,
        TextureSet, Viewport,
    };
    use mosaic_engine::input::MouseButton;

    // s1 (A) is the left half of the square, s2 (B) the right half.
    const CATALOG: &str = r#"{ "shapes": [
        { "id": "s1", "group": "A", "texture": "textures/stone.jpg",
          "points": [[0.0, 0.0], [0.5, 0.0], [0.5, 1.0], [0.0, 1.0]] },
        { "id": "s2", "group": "B", "texture": "textures/marble.jpg",
          "points": [[0.5, 0.0], [1.0, 0.0], [1.0, 1.0], [0.5, 1.0]] }
    ] }"#;

    fn app(w: f32, h: f32) -> ViewerApp {
        let rule = TextureRule::default();
        let mut textures = TextureSet::new();
        for key in rule.keys() {
            textures.insert(TextureImage {
                key: key.clone(),
                width: 1,
                height: 1,
                rgba: vec![255; 4],
            });
        }
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let registry = ShapeRegistry::build(catalog, &textures, &rule, Viewport::new(w, h)).unwrap();
        let scene = LoadedScene { registry, textures };
        ViewerApp::new(scene, rule, Color::white(), None).unwrap()
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved { x, y }
    }

    fn press(button: MouseButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton { button, state: ButtonState::Pressed, x, y }
    }

    fn hovering(app: &ViewerApp) -> Option<&GroupId> {
        app.controller.state().hovered_group()
    }

    fn outlined(app: &ViewerApp) -> Vec<String> {
        app.instructions
            .iter()
            .filter(|i| i.outline.is_some())
            .map(|i| i.shape_id.to_string())
            .collect()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn starts_idle_with_every_shape_textured() {
        let a = app(1000.0, 800.0);
        assert_eq!(a.controller.state(), &HighlightState::Idle);
        assert_eq!(a.instructions.len(), 2);
        assert_eq!(a.textures.len(), 2);
        assert!(a.textures.contains_key(&TextureKey::new("textures/stone.jpg")));
        assert!(a.info.is_none());
    }

    // ── hover ─────────────────────────────────────────────────────────────

    #[test]
    fn pointer_moves_drive_hover() {
        // 1000×800: square spans x 100..900, halves split at x = 500.
        let mut a = app(1000.0, 800.0);

        a.handle_input(&moved(300.0, 400.0));
        assert_eq!(hovering(&a), Some(&GroupId::new("A")));
        assert_eq!(outlined(&a), ["s1"]);

        a.handle_input(&moved(700.0, 400.0));
        assert_eq!(hovering(&a), Some(&GroupId::new("B")));
        assert_eq!(outlined(&a), ["s2"]);

        a.handle_input(&moved(50.0, 400.0));
        assert_eq!(hovering(&a), None);
        assert!(outlined(&a).is_empty());
        assert!(a.hover.current().is_none());
    }

    #[test]
    fn pointer_leave_clears_hover() {
        let mut a = app(1000.0, 800.0);
        a.handle_input(&moved(300.0, 400.0));
        a.handle_input(&InputEvent::PointerLeft);
        assert_eq!(hovering(&a), None);
        assert!(a.pointer.is_none());
    }

    #[test]
    fn focus_loss_clears_hover() {
        let mut a = app(1000.0, 800.0);
        a.handle_input(&moved(300.0, 400.0));
        a.handle_input(&InputEvent::Focused(false));
        assert_eq!(hovering(&a), None);
        assert!(outlined(&a).is_empty());
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_rehovers_the_shape_now_under_the_pointer() {
        let mut a = app(1000.0, 800.0);
        a.handle_input(&moved(300.0, 400.0));
        assert_eq!(outlined(&a), ["s1"]);

        // 400×800: square spans x 0..400, so x = 300 is now over s2.
        a.sync_viewport(400.0, 800.0);
        assert_eq!(hovering(&a), Some(&GroupId::new("B")));
        assert_eq!(a.hover.current(), Some(&ShapeId::new("s2")));
        assert_eq!(outlined(&a), ["s2"]);
    }

    #[test]
    fn resize_moving_shapes_away_clears_hover() {
        let mut a = app(1000.0, 800.0);
        a.handle_input(&moved(300.0, 400.0));

        // 1000×200: square spans x 400..600, y 0..200.
        a.sync_viewport(1000.0, 200.0);
        assert_eq!(hovering(&a), None);
        assert!(a.hover.current().is_none());
        assert!(outlined(&a).is_empty());
    }

    #[test]
    fn resize_without_pointer_only_relayouts() {
        let mut a = app(1000.0, 800.0);
        a.sync_viewport(500.0, 500.0);
        assert_eq!(a.controller.viewport(), Viewport::new(500.0, 500.0));
        assert_eq!(hovering(&a), None);
    }

    #[test]
    fn zero_sized_viewport_keeps_layout_and_hover() {
        let mut a = app(1000.0, 800.0);
        a.handle_input(&moved(300.0, 400.0));
        a.sync_viewport(0.0, 0.0);
        assert_eq!(a.controller.viewport(), Viewport::new(1000.0, 800.0));
        assert_eq!(hovering(&a), Some(&GroupId::new("A")));
    }

    // ── click ─────────────────────────────────────────────────────────────

    #[test]
    fn click_shows_group_and_id() {
        let mut a = app(1000.0, 800.0);
        a.handle_input(&press(MouseButton::Left, 700.0, 400.0));
        assert_eq!(a.info.as_deref(), Some("Group: B | ID: s2"));
        assert_eq!(hovering(&a), None);
    }

    #[test]
    fn any_button_reports_the_shape() {
        let mut a = app(1000.0, 800.0);
        a.handle_input(&press(MouseButton::Right, 300.0, 400.0));
        assert_eq!(a.info.as_deref(), Some("Group: A | ID: s1"));
    }

    #[test]
    fn click_on_background_keeps_previous_text() {
        let mut a = app(1000.0, 800.0);
        a.handle_input(&press(MouseButton::Left, 300.0, 400.0));
        a.handle_input(&press(MouseButton::Left, 20.0, 20.0));
        assert_eq!(a.info.as_deref(), Some("Group: A | ID: s1"));
    }

    #[test]
    fn release_does_not_click() {
        let mut a = app(1000.0, 800.0);
        let release = InputEvent::PointerButton {
            button: MouseButton::Left,
            state: ButtonState::Released,
            x: 300.0,
            y: 400.0,
        };
        a.handle_input(&release);
        assert!(a.info.is_none());
    }

    // ── keyboard ──────────────────────────────────────────────────────────

    #[test]
    fn escape_exits() {
        let mut a = app(1000.0, 800.0);
        let esc = InputEvent::Key { key: Key::Escape, state: ButtonState::Pressed, repeat: false };
        assert_eq!(a.handle_input(&esc), AppControl::Exit);
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut a = app(1000.0, 800.0);
        let other = InputEvent::Key { key: Key::Other, state: ButtonState::Pressed, repeat: false };
        assert_eq!(a.handle_input(&other), AppControl::Continue);
        let released = InputEvent::Key { key: Key::Escape, state: ButtonState::Released, repeat: false };
        assert_eq!(a.handle_input(&released), AppControl::Continue);
    }
}
